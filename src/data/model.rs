use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

use super::column::ColumnKey;

// ---------------------------------------------------------------------------
// Cell – a single raw value as delivered by a row source
// ---------------------------------------------------------------------------

/// Signed number whose integer part is grouped in threes, e.g. `-1,234.5`.
static THOUSANDS_GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").expect("valid grouping pattern"));

/// A raw, untyped cell. Spreadsheet APIs hand back formatted text, local
/// files may carry real numbers, and short rows simply have nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Empty => write!(f, "<empty>"),
        }
    }
}

impl Cell {
    /// Interpret the cell as a finite number.
    ///
    /// Text is trimmed and a trailing `%` is dropped. Commas are accepted
    /// only as thousands grouping (`1,923.45`); any other comma, such as a
    /// decimal comma in `-0,57`, makes the cell `None`. Anything that still
    /// does not parse, or parses to NaN or an infinity, is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => {
                let s = s.trim();
                let s = s.strip_suffix('%').unwrap_or(s).trim_end();
                if s.is_empty() {
                    return None;
                }
                if s.contains(',') {
                    if !THOUSANDS_GROUPED.is_match(s) {
                        return None;
                    }
                    s.replace(',', "").parse::<f64>().ok()?
                } else {
                    s.parse::<f64>().ok()?
                }
            }
            Cell::Empty => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Textual content for date parsing; numbers and empty cells have none.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&JsonValue> for Cell {
    fn from(val: &JsonValue) -> Self {
        match val {
            JsonValue::String(s) => Cell::Text(s.clone()),
            JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            JsonValue::Null => Cell::Empty,
            other => Cell::Text(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one observation date
// ---------------------------------------------------------------------------

/// All observations for a single date.
///
/// A key that is absent and a key mapped to `None` both mean "no value".
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub values: BTreeMap<ColumnKey, Option<f64>>,
}

impl Record {
    pub fn new(date: NaiveDate) -> Self {
        Record {
            date,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter, handy for constructing records in code.
    pub fn with(mut self, key: ColumnKey, value: impl Into<Option<f64>>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Raw stored value for `key`, flattening "absent" and "null".
    pub fn get(&self, key: ColumnKey) -> Option<f64> {
        self.values.get(&key).copied().flatten()
    }

    /// Value for `key` only if it is a finite number.
    pub fn finite(&self, key: ColumnKey) -> Option<f64> {
        self.get(key).filter(|v| v.is_finite())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete ingested table
// ---------------------------------------------------------------------------

/// Records in chronological order, plus what the header row contained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Header columns that matched a known [`ColumnKey`], in header order.
    pub columns: Vec<ColumnKey>,
    /// Header names that matched nothing and were dropped.
    pub ignored_columns: Vec<String>,
}

impl Dataset {
    /// Build a dataset, putting records into date order.
    ///
    /// The sort is stable, so rows sharing a date keep their source order.
    pub fn from_records(
        mut records: Vec<Record>,
        columns: Vec<ColumnKey>,
        ignored_columns: Vec<String>,
    ) -> Self {
        let in_order = records.windows(2).all(|w| w[0].date <= w[1].date);
        if !in_order {
            log::warn!("source rows are not in date order; sorting {} records", records.len());
            records.sort_by_key(|r| r.date);
        }
        Dataset {
            records,
            columns,
            ignored_columns,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last observation dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }
}
