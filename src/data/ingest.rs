use chrono::{DateTime, NaiveDate};

use super::column::ColumnKey;
use super::model::{Cell, Dataset, Record};
use crate::error::IngestError;

// ---------------------------------------------------------------------------
// Row table → Dataset
// ---------------------------------------------------------------------------

/// Normalise a header-first row table into typed records.
///
/// Layout:
/// ```text
///   Date       | 10YUSY.B | 1YUSY.B | ...
///   2021-01-04 | 0.93     | 0.10    | ...
/// ```
///
/// * Header names that are not a known source column are ignored, as are
///   repeats of a column already seen (the first occurrence wins).
///   Derived column names in the header are ignored too; they are always
///   recomputed.
/// * Short rows yield `None` for the missing trailing cells.
/// * A row whose first cell is not a recognisable date is skipped.
pub fn records_from_rows(rows: &[Vec<Cell>]) -> Result<Dataset, IngestError> {
    let (header, data) = match rows {
        [] => return Err(IngestError::MissingHeader),
        [_] => return Err(IngestError::TooFewRows { rows: 1 }),
        [header, data @ ..] => (header, data),
    };

    // Column slots by header index, skipping the date column.
    let mut slots: Vec<(usize, ColumnKey)> = Vec::new();
    let mut ignored = Vec::new();
    for (idx, cell) in header.iter().enumerate().skip(1) {
        let name = match cell {
            Cell::Empty => String::new(),
            other => other.to_string(),
        };
        match ColumnKey::from_header(&name).filter(|k| !k.is_derived()) {
            Some(key) if slots.iter().any(|&(_, seen)| seen == key) => {
                log::warn!("duplicate header column {name:?} at index {idx}; keeping the first");
                ignored.push(name);
            }
            Some(key) => slots.push((idx, key)),
            None => {
                log::debug!("ignoring unknown header column {name:?} at index {idx}");
                ignored.push(name);
            }
        }
    }

    let mut records = Vec::with_capacity(data.len());
    for (row_no, row) in data.iter().enumerate() {
        let Some(date) = row.first().and_then(parse_date) else {
            log::warn!("row {}: unrecognised date {:?}; skipping", row_no + 1, row.first());
            continue;
        };

        let mut record = Record::new(date);
        for &(idx, key) in &slots {
            let value = row.get(idx).and_then(Cell::as_f64);
            record.values.insert(key, value);
        }
        records.push(record);
    }

    let columns = slots.into_iter().map(|(_, k)| k).collect();
    let dataset = Dataset::from_records(records, columns, ignored);
    log::debug!(
        "ingested {} records ({} rows read) with columns {:?}",
        dataset.len(),
        data.len(),
        dataset.columns
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parse an ISO-like date cell.
///
/// Accepts `2021-01-04`, `2021/1/4`, `2021.01.04` and RFC 3339 timestamps
/// (only the date part is kept).
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    let s = cell.as_text()?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_table_is_missing_header() {
        assert!(matches!(records_from_rows(&[]), Err(IngestError::MissingHeader)));
    }

    #[test]
    fn header_only_is_too_few_rows() {
        let rows = vec![row(&["Date", "10YUSY.B"])];
        assert!(matches!(
            records_from_rows(&rows),
            Err(IngestError::TooFewRows { rows: 1 })
        ));
    }

    #[test]
    fn parses_known_columns_and_nulls_the_rest() {
        let rows = vec![
            row(&["Date", "10YUSY.B", "1YUSY.B", "Notes", "XAUUSD"]),
            row(&["2021-01-04", "0.93", "n/a", "hello", "1,943.20"]),
            row(&["2021-01-05", "0.95"]),
        ];
        let ds = records_from_rows(&rows).unwrap();

        assert_eq!(ds.columns, vec![ColumnKey::Us10Y, ColumnKey::Us1Y, ColumnKey::Gold]);
        assert_eq!(ds.ignored_columns, vec!["Notes".to_string()]);
        assert_eq!(ds.len(), 2);

        let first = &ds.records[0];
        assert_eq!(first.date, ymd(2021, 1, 4));
        assert_eq!(first.get(ColumnKey::Us10Y), Some(0.93));
        assert_eq!(first.get(ColumnKey::Us1Y), None);
        assert_eq!(first.get(ColumnKey::Gold), Some(1943.2));

        let second = &ds.records[1];
        assert_eq!(second.get(ColumnKey::Us10Y), Some(0.95));
        assert_eq!(second.get(ColumnKey::Gold), None);
    }

    #[test]
    fn derived_names_in_header_are_not_trusted() {
        let rows = vec![
            row(&["Date", "US_SPREAD"]),
            row(&["2021-01-04", "9.99"]),
        ];
        let ds = records_from_rows(&rows).unwrap();
        assert!(ds.columns.is_empty());
        assert_eq!(ds.records[0].get(ColumnKey::UsSpread), None);
    }

    #[test]
    fn duplicate_header_keeps_first_column() {
        let rows = vec![
            row(&["Date", "USDJPY", "10YUSY.B", "USDJPY"]),
            row(&["2021-01-04", "103.0", "0.93", ""]),
            row(&["2021-01-05", "", "0.95", "104.0"]),
        ];
        let ds = records_from_rows(&rows).unwrap();

        assert_eq!(ds.columns, vec![ColumnKey::UsdJpy, ColumnKey::Us10Y]);
        assert_eq!(ds.ignored_columns, vec!["USDJPY".to_string()]);
        assert_eq!(ds.records[0].get(ColumnKey::UsdJpy), Some(103.0));
        assert_eq!(ds.records[1].get(ColumnKey::UsdJpy), None);
    }

    #[test]
    fn bad_dates_are_skipped_and_order_restored() {
        let rows = vec![
            row(&["Date", "USDJPY"]),
            row(&["2021/01/06", "104.0"]),
            row(&["not a date", "105.0"]),
            row(&["2021-01-04", "103.0"]),
        ];
        let ds = records_from_rows(&rows).unwrap();
        let dates: Vec<_> = ds.records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![ymd(2021, 1, 4), ymd(2021, 1, 6)]);
    }

    #[test]
    fn date_formats() {
        assert_eq!(parse_date(&Cell::from("2021-1-4")), Some(ymd(2021, 1, 4)));
        assert_eq!(parse_date(&Cell::from("2021.01.04")), Some(ymd(2021, 1, 4)));
        assert_eq!(
            parse_date(&Cell::from("2021-01-04T09:00:00+09:00")),
            Some(ymd(2021, 1, 4))
        );
        assert_eq!(parse_date(&Cell::Number(44200.0)), None);
        assert_eq!(parse_date(&Cell::from("")), None);
    }
}
