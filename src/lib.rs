//! Interest-rate spread pipeline for a financial time-series dashboard.
//!
//! ```text
//!  RowSource ──▶ Dataset ──▶ augment ──▶ filter_pair ──▶ pearson
//!                                              └──────▶ to_time_series / to_scatter_series
//! ```
//!
//! Every stage takes its input by reference and returns a new collection.

pub mod data;
pub mod error;
pub mod pipeline;
pub mod series;
pub mod state;
pub mod stats;

pub use data::column::{ColumnKey, ColumnKind};
pub use data::derive::{augment, SPREADS};
pub use data::filter::filter_pair;
pub use data::loader::{load_file, FileSource};
pub use data::model::{Cell, Dataset, Record};
pub use data::sheets::{SheetsConfig, SheetsSource};
pub use data::RowSource;
pub use error::IngestError;
pub use pipeline::{build_chart_data, ChartData, Selection};
pub use series::{to_scatter_series, to_time_series, ScatterPoint, TimePoint};
pub use state::Dashboard;
pub use stats::{format_correlation, pearson, pearson_records};
