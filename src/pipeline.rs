use serde::{Deserialize, Serialize};

use crate::data::column::ColumnKey;
use crate::data::filter::filter_pair;
use crate::data::model::Record;
use crate::series::{to_scatter_series, to_time_series, ScatterPoint, TimePoint};
use crate::stats::pearson;

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The two columns being compared. They may be the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub var1: ColumnKey,
    pub var2: ColumnKey,
}

impl Selection {
    pub fn new(var1: ColumnKey, var2: ColumnKey) -> Self {
        Selection { var1, var2 }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::new(ColumnKey::De10Y, ColumnKey::De1Y)
    }
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// Everything a renderer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub selection: Selection,
    pub primary_label: &'static str,
    pub secondary_label: &'static str,
    /// `var1` over time, left value axis.
    pub primary: Vec<TimePoint>,
    /// `var2` over time, right value axis.
    pub secondary: Vec<TimePoint>,
    pub scatter: Vec<ScatterPoint>,
    /// Pearson's r, NaN when undefined (serialized as `null`).
    pub correlation: f64,
}

impl ChartData {
    /// Number of dates where both columns have values.
    pub fn len(&self) -> usize {
        self.scatter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scatter.is_empty()
    }
}

/// Filter `records` on the selection, then project and correlate.
///
/// `records` should already be augmented when the selection names a
/// derived column.
pub fn build_chart_data(records: &[Record], selection: Selection) -> ChartData {
    let Selection { var1, var2 } = selection;
    let filtered = filter_pair(records, var1, var2);

    let scatter = to_scatter_series(&filtered, var1, var2);
    let (xs, ys): (Vec<f64>, Vec<f64>) = scatter.iter().map(|p| (p.x, p.y)).unzip();
    let correlation = pearson(&xs, &ys);

    log::debug!(
        "selection {var1}/{var2}: {} of {} records usable, r = {correlation}",
        filtered.len(),
        records.len()
    );

    ChartData {
        selection,
        primary_label: var1.label(),
        secondary_label: var2.label(),
        primary: to_time_series(&filtered, var1),
        secondary: to_time_series(&filtered, var2),
        scatter,
        correlation,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::derive::augment;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 2, d).unwrap()
    }

    #[test]
    fn default_selection_is_german_curve() {
        let sel = Selection::default();
        assert_eq!(sel.var1, ColumnKey::De10Y);
        assert_eq!(sel.var2, ColumnKey::De1Y);
    }

    #[test]
    fn builds_series_from_derived_columns() {
        let records = augment(&[
            Record::new(day(1))
                .with(ColumnKey::Us10Y, 3.5)
                .with(ColumnKey::Us1Y, 4.5)
                .with(ColumnKey::UsdJpy, 130.0),
            Record::new(day(2)).with(ColumnKey::Us10Y, 3.6).with(ColumnKey::UsdJpy, 131.0),
            Record::new(day(3))
                .with(ColumnKey::Us10Y, 3.75)
                .with(ColumnKey::Us1Y, 4.75)
                .with(ColumnKey::UsdJpy, 132.0),
        ]);
        let chart = build_chart_data(&records, Selection::new(ColumnKey::UsSpread, ColumnKey::UsdJpy));

        assert_eq!(chart.len(), 2);
        assert_eq!(chart.primary.iter().map(|p| p.x).collect::<Vec<_>>(), vec![day(1), day(3)]);
        assert_eq!(chart.primary[0].y, Some(-1.0));
        assert_eq!(chart.secondary[1].y, Some(132.0));
        assert_eq!(chart.primary_label, "米国長短期金利差");
        // Spread is constant (-1.0) on both usable dates.
        assert!(chart.correlation.is_nan());
    }

    #[test]
    fn nan_correlation_serializes_as_null() {
        let chart = build_chart_data(&[], Selection::default());
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["correlation"], serde_json::Value::Null);
        assert_eq!(json["selection"]["var1"], "10YDEY.B");
        assert!(chart.is_empty());
    }
}
