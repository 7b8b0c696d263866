/// Data layer: core types, ingestion, derivation and filtering.
///
/// Architecture:
/// ```text
///  spreadsheet API / .csv / .json / .parquet
///        │
///        ▼
///   ┌───────────────────┐
///   │ sheets / loader    │  fetch or read → header-first row table
///   └───────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  ingest   │  rows → Dataset (typed records, date order)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  add the five spread columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  keep records with both selected columns present
///   └──────────┘
/// ```

pub mod column;
pub mod derive;
pub mod filter;
pub mod ingest;
pub mod loader;
pub mod model;
pub mod sheets;

use anyhow::Result;

use model::Dataset;

/// Anything that can produce a fresh [`Dataset`].
///
/// A load either returns the whole table or fails; there is no partial
/// result.
pub trait RowSource {
    fn load(&self) -> Result<Dataset>;
}
