use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type,
};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::ingest::records_from_rows;
use super::model::{Cell, Dataset};
use super::RowSource;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a time-series table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row `Date,<col>,...` followed by one row per date
/// * `.json`    – a spreadsheet `ValueRange` (`{"values": [[...], ...]}`)
///   or a bare array of row arrays
/// * `.parquet` – wide table with a `Date` column and numeric columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "parquet" | "pq" => read_parquet_rows(path)?,
        "json" => read_json_rows(path)?,
        "csv" => read_csv_rows(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = records_from_rows(&rows)
        .with_context(|| format!("normalising rows from {}", path.display()))?;
    log::info!(
        "Loaded {} records from {} with columns {:?}",
        dataset.len(),
        path.display(),
        dataset.columns
    );
    Ok(dataset)
}

/// A file on disk acting as the row source.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl RowSource for FileSource {
    fn load(&self) -> Result<Dataset> {
        load_file(&self.path)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepted JSON shapes:
///
/// ```json
/// { "range": "Sheet1!A1:L900", "majorDimension": "ROWS",
///   "values": [["Date", "10YUSY.B"], ["2021-01-04", "0.93"]] }
/// ```
///
/// or just the inner `[[...], ...]` array.
fn read_json_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    json_rows(&root)
}

/// Extract a row table from a parsed JSON document.
pub(crate) fn json_rows(root: &JsonValue) -> Result<Vec<Vec<Cell>>> {
    let table = match root {
        JsonValue::Object(obj) => match obj.get("values") {
            Some(values) => values,
            // The values API omits `values` entirely for an empty range.
            None => return Ok(Vec::new()),
        },
        other => other,
    };

    let rows = table
        .as_array()
        .context("Expected a JSON array of rows")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = row
                .as_array()
                .with_context(|| format!("Row {i} is not a JSON array"))?;
            Ok(cells.iter().map(Cell::from).collect())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// The header row is read as an ordinary row; rows may be shorter than it.
fn read_csv_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(csv_cell).collect());
    }
    Ok(rows)
}

fn csv_cell(s: &str) -> Cell {
    if s.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a wide Parquet table.
///
/// Expected schema:
/// - first column: the date, as Utf8/LargeUtf8 text or Date32
/// - remaining columns: Float64/Float32/Int64/Int32 values, or text
///
/// Column names become the header row.
fn read_parquet_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let header: Vec<Cell> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Cell::Text(f.name().clone()))
        .collect();
    if header.is_empty() {
        bail!("Parquet file has no columns");
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut rows = vec![header];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        // Data rows already read; batch indices restart at zero.
        let first_row = rows.len() - 1;
        append_batch_rows(&mut rows, &batch, first_row)?;
    }

    Ok(rows)
}

/// Append every row of `batch`, numbering errors from `first_row`.
fn append_batch_rows(
    rows: &mut Vec<Vec<Cell>>,
    batch: &RecordBatch,
    first_row: usize,
) -> Result<()> {
    for row in 0..batch.num_rows() {
        let cells = batch
            .columns()
            .iter()
            .map(|col| arrow_cell(col, row))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Row {}", first_row + row))?;
        rows.push(cells);
    }
    Ok(())
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Empty);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => Cell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Date32 => match col.as_primitive::<Date32Type>().value_as_date(row) {
            Some(date) => Cell::Text(date.format("%Y-%m-%d").to_string()),
            None => Cell::Empty,
        },
        other => bail!("Unsupported parquet column type {other:?}"),
    };
    Ok(cell)
}
