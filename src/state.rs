use chrono::NaiveDate;

use crate::data::column::ColumnKey;
use crate::data::derive::augment;
use crate::data::model::{Dataset, Record};
use crate::data::RowSource;
use crate::pipeline::{build_chart_data, ChartData, Selection};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// One ingested table, augmented once, queried per selection.
///
/// Holds no selection of its own: every [`Dashboard::chart`] call starts
/// from the same augmented records, so repeated calls are identical.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    /// Records with the derived spread columns filled in.
    records: Vec<Record>,

    /// Source columns the ingested header carried.
    columns: Vec<ColumnKey>,

    /// Status / error message of the last refresh.
    pub status_message: Option<String>,
}

impl Dashboard {
    /// The "no data yet" state.
    pub fn empty() -> Self {
        Dashboard::default()
    }

    /// Augment a freshly ingested dataset.
    pub fn new(dataset: Dataset) -> Self {
        Dashboard {
            records: augment(&dataset.records),
            columns: dataset.columns,
            status_message: None,
        }
    }

    /// Replace the data with whatever `source` returns.
    ///
    /// On failure the previous data stays in place and the error is kept
    /// in [`Dashboard::status_message`].
    pub fn refresh(&mut self, source: &dyn RowSource) -> anyhow::Result<()> {
        match source.load() {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records with columns {:?}",
                    dataset.len(),
                    dataset.columns
                );
                *self = Dashboard::new(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    /// Chart data for `selection`.
    pub fn chart(&self, selection: Selection) -> ChartData {
        build_chart_data(&self.records, selection)
    }

    /// Augmented records, in date order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn source_columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }
}
