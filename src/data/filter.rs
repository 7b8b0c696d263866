use super::column::ColumnKey;
use super::model::Record;

// ---------------------------------------------------------------------------
// Pair filter: keep records where both selected columns are usable
// ---------------------------------------------------------------------------

/// Whether `record` holds finite values for both keys.
pub fn has_pair(record: &Record, key_a: ColumnKey, key_b: ColumnKey) -> bool {
    record.finite(key_a).is_some() && record.finite(key_b).is_some()
}

/// Return indices of records that pass [`has_pair`], in input order.
pub fn pair_indices(records: &[Record], key_a: ColumnKey, key_b: ColumnKey) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| has_pair(r, key_a, key_b))
        .map(|(i, _)| i)
        .collect()
}

/// Records holding finite values for both keys, preserving order.
///
/// A key that no record carries simply filters everything out.
pub fn filter_pair(records: &[Record], key_a: ColumnKey, key_b: ColumnKey) -> Vec<Record> {
    records
        .iter()
        .filter(|r| has_pair(r, key_a, key_b))
        .cloned()
        .collect()
}
