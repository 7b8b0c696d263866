use crate::data::column::ColumnKey;
use crate::data::model::Record;

// ---------------------------------------------------------------------------
// Pearson correlation
// ---------------------------------------------------------------------------

/// Pearson's r over two equally long series.
///
/// Equal in value to the sum form
/// `(n·Σxy − Σx·Σy) / sqrt((n·Σx² − (Σx)²)·(n·Σy² − (Σy)²))`, but accumulated
/// about the means so that series sitting on a large offset (an index near
/// 30 000 moving by a few hundredths) keep their precision.
///
/// Returns NaN when there are fewer than two points, when the lengths
/// differ, or when either series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() {
        log::warn!("pearson: length mismatch ({} vs {})", xs.len(), ys.len());
        return f64::NAN;
    }
    let n = xs.len();
    if n < 2 || is_constant(xs) || is_constant(ys) {
        return f64::NAN;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return f64::NAN;
    }

    let r = cov / (var_x * var_y).sqrt();
    if r.is_nan() {
        r
    } else {
        r.clamp(-1.0, 1.0)
    }
}

/// Exact equality; the rounded mean of a constant non-integer series need
/// not equal its value.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Pearson's r between two columns of already filtered records.
pub fn pearson_records(records: &[Record], key_a: ColumnKey, key_b: ColumnKey) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = records
        .iter()
        .filter_map(|r| Some((r.finite(key_a)?, r.finite(key_b)?)))
        .unzip();
    pearson(&xs, &ys)
}

/// Render a coefficient for display, `"N/A"` when undefined.
pub fn format_correlation(r: f64, decimals: usize) -> String {
    if r.is_finite() {
        format!("{r:.decimals$}")
    } else {
        "N/A".to_string()
    }
}
