use super::column::ColumnKey;
use super::model::Record;

// ---------------------------------------------------------------------------
// Spread schema
// ---------------------------------------------------------------------------

/// `target = minuend - subtrahend`, null unless both operands are finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadDef {
    pub target: ColumnKey,
    pub minuend: ColumnKey,
    pub subtrahend: ColumnKey,
}

impl SpreadDef {
    /// Evaluate this spread for one record.
    pub fn apply(&self, record: &Record) -> Option<f64> {
        let long = record.finite(self.minuend)?;
        let short = record.finite(self.subtrahend)?;
        Some(long - short)
    }
}

/// The fixed set of derived columns.
///
/// The first three are term spreads (10Y minus 1Y within one country), the
/// last two are cross-country spreads at the 10Y tenor.
pub static SPREADS: [SpreadDef; 5] = [
    SpreadDef {
        target: ColumnKey::UsSpread,
        minuend: ColumnKey::Us10Y,
        subtrahend: ColumnKey::Us1Y,
    },
    SpreadDef {
        target: ColumnKey::DeSpread,
        minuend: ColumnKey::De10Y,
        subtrahend: ColumnKey::De1Y,
    },
    SpreadDef {
        target: ColumnKey::JpSpread,
        minuend: ColumnKey::Jp10Y,
        subtrahend: ColumnKey::Jp1Y,
    },
    SpreadDef {
        target: ColumnKey::JpUsSpread,
        minuend: ColumnKey::Us10Y,
        subtrahend: ColumnKey::Jp10Y,
    },
    SpreadDef {
        target: ColumnKey::JpDeSpread,
        minuend: ColumnKey::De10Y,
        subtrahend: ColumnKey::Jp10Y,
    },
];

/// Spread definition for a derived column.
pub fn spread_for(key: ColumnKey) -> Option<&'static SpreadDef> {
    SPREADS.iter().find(|s| s.target == key)
}

// ---------------------------------------------------------------------------
// augment
// ---------------------------------------------------------------------------

/// Return new records carrying all five derived columns.
///
/// Source fields are copied unchanged; any derived values already present
/// are overwritten.
pub fn augment(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            let mut out = record.clone();
            for spread in &SPREADS {
                out.values.insert(spread.target, spread.apply(record));
            }
            out
        })
        .collect()
}
