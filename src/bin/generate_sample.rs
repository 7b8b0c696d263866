use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Builder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use parquet::arrow::ArrowWriter;
use rate_spreads::ColumnKey;

/// Source columns written, with (start level, daily volatility).
const COLUMNS: &[(ColumnKey, f64, f64)] = &[
    (ColumnKey::De10Y, -0.50, 0.02),
    (ColumnKey::De1Y, -0.70, 0.01),
    (ColumnKey::Us1Y, 0.10, 0.01),
    (ColumnKey::Us10Y, 0.95, 0.03),
    (ColumnKey::Jp1Y, -0.12, 0.005),
    (ColumnKey::Jp10Y, 0.02, 0.01),
    (ColumnKey::UsdJpy, 103.0, 0.4),
    (ColumnKey::EurJpy, 126.0, 0.5),
    (ColumnKey::CrudeOil, 48.0, 1.0),
    (ColumnKey::Platinum, 1070.0, 15.0),
    (ColumnKey::Gold, 1900.0, 12.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Business days starting at `start`.
fn business_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(count);
    let mut day = start;
    while out.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(day);
        }
        day += Duration::days(1);
    }
    out
}

/// Random walks per column; roughly 2% of cells are left blank.
fn generate(rng: &mut SimpleRng, n_days: usize) -> Vec<Vec<Option<f64>>> {
    COLUMNS
        .iter()
        .map(|&(_, start, vol)| {
            let mut level = start;
            (0..n_days)
                .map(|_| {
                    level += rng.gauss(0.0, vol);
                    (rng.next_f64() > 0.02).then_some((level * 1e4).round() / 1e4)
                })
                .collect()
        })
        .collect()
}

fn write_csv(path: &str, dates: &[NaiveDate], columns: &[Vec<Option<f64>>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    let mut header = vec!["Date".to_string()];
    header.extend(COLUMNS.iter().map(|(k, _, _)| k.to_string()));
    writer.write_record(&header)?;

    for (i, date) in dates.iter().enumerate() {
        let mut row = vec![date.format("%Y-%m-%d").to_string()];
        row.extend(columns.iter().map(|col| col[i].map(|v| v.to_string()).unwrap_or_default()));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, dates: &[NaiveDate], columns: &[Vec<Option<f64>>]) -> Result<()> {
    let mut fields = vec![Field::new("Date", DataType::Utf8, false)];
    fields.extend(
        COLUMNS
            .iter()
            .map(|(k, _, _)| Field::new(k.as_str(), DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let date_strings: Vec<String> = dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(date_strings))];
    for col in columns {
        let mut builder = Float64Builder::with_capacity(col.len());
        for v in col {
            builder.append_option(*v);
        }
        arrays.push(Arc::new(builder.finish()));
    }

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2021, 1, 4).context("invalid start date")?;
    let dates = business_days(start, 750);
    let columns = generate(&mut rng, dates.len());

    write_csv("sample_data.csv", &dates, &columns)?;
    write_parquet("sample_data.parquet", &dates, &columns)?;

    log::info!(
        "Wrote {} days x {} columns to sample_data.csv and sample_data.parquet",
        dates.len(),
        COLUMNS.len()
    );
    Ok(())
}
