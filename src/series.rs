use chrono::NaiveDate;
use serde::Serialize;

use crate::data::column::ColumnKey;
use crate::data::model::Record;

/// One point of a line series sharing the date axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub x: NaiveDate,
    pub y: Option<f64>,
}

/// One point of the scatter plot, tagged with its observation date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
}

/// Project `key` over time. No filtering happens here.
pub fn to_time_series(records: &[Record], key: ColumnKey) -> Vec<TimePoint> {
    records
        .iter()
        .map(|r| TimePoint {
            x: r.date,
            y: r.get(key),
        })
        .collect()
}

/// Project `(key_a, key_b)` pairs for the scatter plot.
///
/// Expects pair-filtered input; a missing value shows up as NaN.
pub fn to_scatter_series(records: &[Record], key_a: ColumnKey, key_b: ColumnKey) -> Vec<ScatterPoint> {
    records
        .iter()
        .map(|r| ScatterPoint {
            x: r.get(key_a).unwrap_or(f64::NAN),
            y: r.get(key_b).unwrap_or(f64::NAN),
            date: r.date,
        })
        .collect()
}
