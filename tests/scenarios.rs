//! End-to-end checks of the ingest → augment → filter → correlate → project chain.

use chrono::NaiveDate;
use rate_spreads::data::ingest::records_from_rows;
use rate_spreads::{
    augment, build_chart_data, filter_pair, pearson, to_scatter_series, to_time_series, Cell,
    ColumnKey, Dashboard, Dataset, Record, Selection,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn jan(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
}

fn rows(table: &[&[&str]]) -> Vec<Vec<Cell>> {
    table
        .iter()
        .map(|row| row.iter().map(|c| Cell::from(*c)).collect())
        .collect()
}

#[test]
fn scenario_us_spread_is_difference() {
    let input = vec![Record::new(jan(1))
        .with(ColumnKey::Us10Y, 1.5)
        .with(ColumnKey::Us1Y, 0.2)];
    let out = augment(&input);
    assert!((out[0].get(ColumnKey::UsSpread).unwrap() - 1.3).abs() < 1e-12);
}

#[test]
fn scenario_missing_short_rate_drops_record() {
    let input = vec![
        Record::new(jan(1)).with(ColumnKey::Us10Y, 1.5),
        Record::new(jan(2))
            .with(ColumnKey::Us10Y, 1.6)
            .with(ColumnKey::Us1Y, 0.2)
            .with(ColumnKey::De10Y, -0.5)
            .with(ColumnKey::De1Y, -0.7),
    ];
    let augmented = augment(&input);
    assert_eq!(augmented[0].get(ColumnKey::UsSpread), None);

    let kept = filter_pair(&augmented, ColumnKey::UsSpread, ColumnKey::DeSpread);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].date, jan(2));
}

#[test]
fn scenario_exact_linear_relation() {
    let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]);
    assert_eq!(r, 1.0);
}

#[test]
fn scenario_zero_variance() {
    assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
}

#[test]
fn scenario_empty_pipeline() {
    let records = augment(&Dataset::default().records);
    assert!(records.is_empty());

    let filtered = filter_pair(&records, ColumnKey::UsSpread, ColumnKey::JpSpread);
    assert!(filtered.is_empty());
    assert!(pearson(&[], &[]).is_nan());
    assert!(to_time_series(&filtered, ColumnKey::UsSpread).is_empty());
    assert!(to_scatter_series(&filtered, ColumnKey::UsSpread, ColumnKey::JpSpread).is_empty());

    let chart = Dashboard::empty().chart(Selection::default());
    assert!(chart.is_empty());
    assert!(chart.correlation.is_nan());
}

#[test]
fn sheet_rows_to_chart() {
    init_logging();
    let table = rows(&[
        &["Date", "10YUSY.B", "1YUSY.B", "10YJPY.B", "1YJPY.B", "USDJPY"],
        &["2021-01-06", "1.04", "0.10", "0.04", "-0.13", "103.0"],
        &["2021-01-04", "0.93", "0.10", "0.02", "-0.13", "103.2"],
        &["2021-01-05", "0.96", "", "0.03", "-0.13", "102.7"],
        &["2021-01-07", "1.08", "0.11", "#N/A", "-0.12", "103.8"],
        &["2021-01-08", "1.12", "0.10", "0.05", "-0.12", "103.9"],
    ]);
    let dataset = records_from_rows(&table).unwrap();
    let dates: Vec<_> = dataset.records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![jan(4), jan(5), jan(6), jan(7), jan(8)]);

    let dash = Dashboard::new(dataset);
    let chart = dash.chart(Selection::new(ColumnKey::JpUsSpread, ColumnKey::UsdJpy));

    // Jan 7 lacks the JP 10Y yield, every other day has both.
    let days: Vec<_> = chart.primary.iter().map(|p| p.x).collect();
    assert_eq!(days, vec![jan(4), jan(5), jan(6), jan(8)]);
    assert_eq!(chart.primary.len(), chart.secondary.len());
    assert!((chart.primary[0].y.unwrap() - 0.91).abs() < 1e-12);
    assert!(chart.correlation.is_finite());
    assert!((-1.0..=1.0).contains(&chart.correlation));

    let us = dash.chart(Selection::new(ColumnKey::UsSpread, ColumnKey::Us10Y));
    assert_eq!(us.len(), 4);
}

#[test]
fn selection_of_same_column_correlates_to_one() {
    let records: Vec<Record> = (1..=10)
        .map(|d| Record::new(jan(d)).with(ColumnKey::Gold, 1800.0 + (d * d) as f64))
        .collect();
    let chart = build_chart_data(&records, Selection::new(ColumnKey::Gold, ColumnKey::Gold));
    assert_eq!(chart.len(), 10);
    assert!((chart.correlation - 1.0).abs() < 1e-12);
}

#[test]
fn pipeline_is_repeatable() {
    let records: Vec<Record> = (1..=20)
        .map(|d| {
            Record::new(jan(d))
                .with(ColumnKey::De10Y, -0.5 + 0.01 * d as f64)
                .with(ColumnKey::De1Y, -0.7 + (d % 3) as f64 * 0.005)
                .with(ColumnKey::Jp10Y, 0.02 + (d % 5) as f64 * 0.003)
        })
        .collect();
    let sel = Selection::new(ColumnKey::DeSpread, ColumnKey::JpDeSpread);

    let first = build_chart_data(&augment(&records), sel);
    let second = build_chart_data(&augment(&records), sel);
    assert_eq!(first.primary, second.primary);
    assert_eq!(first.secondary, second.secondary);
    assert_eq!(first.scatter, second.scatter);
    assert_eq!(first.correlation.to_bits(), second.correlation.to_bits());
}
