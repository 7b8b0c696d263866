use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ColumnKey – the closed set of selectable columns
// ---------------------------------------------------------------------------

/// Whether a column arrives from the data source or is computed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Source,
    Derived,
}

/// Every column the dashboard knows how to chart.
///
/// Source columns are matched against the header row by their wire name
/// (`10YUSY.B`, `CL=F`, ...). Derived columns are filled in by
/// [`crate::data::derive::augment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnKey {
    De10Y,
    De1Y,
    Us1Y,
    Us10Y,
    Jp1Y,
    Jp10Y,
    UsdJpy,
    EurJpy,
    CrudeOil,
    Platinum,
    Gold,
    Nikkei225,
    Sp500,
    UsSpread,
    DeSpread,
    JpSpread,
    JpUsSpread,
    JpDeSpread,
}

impl ColumnKey {
    /// All selectable columns, in menu order.
    pub const ALL: [ColumnKey; 18] = [
        ColumnKey::De10Y,
        ColumnKey::De1Y,
        ColumnKey::Us1Y,
        ColumnKey::Us10Y,
        ColumnKey::Jp1Y,
        ColumnKey::Jp10Y,
        ColumnKey::UsdJpy,
        ColumnKey::EurJpy,
        ColumnKey::CrudeOil,
        ColumnKey::Platinum,
        ColumnKey::Gold,
        ColumnKey::Nikkei225,
        ColumnKey::Sp500,
        ColumnKey::UsSpread,
        ColumnKey::DeSpread,
        ColumnKey::JpSpread,
        ColumnKey::JpUsSpread,
        ColumnKey::JpDeSpread,
    ];

    /// Name used in the spreadsheet header row and in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKey::De10Y => "10YDEY.B",
            ColumnKey::De1Y => "1YDEY.B",
            ColumnKey::Us1Y => "1YUSY.B",
            ColumnKey::Us10Y => "10YUSY.B",
            ColumnKey::Jp1Y => "1YJPY.B",
            ColumnKey::Jp10Y => "10YJPY.B",
            ColumnKey::UsdJpy => "USDJPY",
            ColumnKey::EurJpy => "EURJPY",
            ColumnKey::CrudeOil => "CL=F",
            ColumnKey::Platinum => "PL=F",
            ColumnKey::Gold => "XAUUSD",
            ColumnKey::Nikkei225 => "^N225",
            ColumnKey::Sp500 => "^GSPC",
            ColumnKey::UsSpread => "US_SPREAD",
            ColumnKey::DeSpread => "DE_SPREAD",
            ColumnKey::JpSpread => "JP_SPREAD",
            ColumnKey::JpUsSpread => "JP_US_SPREAD",
            ColumnKey::JpDeSpread => "JP_DE_SPREAD",
        }
    }

    /// Human-readable label shown next to selectors and axes.
    pub fn label(self) -> &'static str {
        match self {
            ColumnKey::De10Y => "ドイツ10年国債利回り",
            ColumnKey::De1Y => "ドイツ1年国債利回り",
            ColumnKey::Us1Y => "米国１年国債利回り",
            ColumnKey::Us10Y => "米国10年国債利回り",
            ColumnKey::Jp1Y => "日本1年国債利回り",
            ColumnKey::Jp10Y => "日本10年国債利回り",
            ColumnKey::UsdJpy => "ドル円為替レート",
            ColumnKey::EurJpy => "ユーロ円為替レート",
            ColumnKey::CrudeOil => "原油価格（WTI）",
            ColumnKey::Platinum => "プラチナ",
            ColumnKey::Gold => "金 (ozt) / 米ドル",
            ColumnKey::Nikkei225 => "日経平均株価",
            ColumnKey::Sp500 => "S&P 500",
            ColumnKey::UsSpread => "米国長短期金利差",
            ColumnKey::DeSpread => "ドイツ長短期金利差",
            ColumnKey::JpSpread => "日本長短期金利差",
            ColumnKey::JpUsSpread => "日米金利差",
            ColumnKey::JpDeSpread => "日独金利差",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            ColumnKey::UsSpread
            | ColumnKey::DeSpread
            | ColumnKey::JpSpread
            | ColumnKey::JpUsSpread
            | ColumnKey::JpDeSpread => ColumnKind::Derived,
            _ => ColumnKind::Source,
        }
    }

    pub fn is_derived(self) -> bool {
        self.kind() == ColumnKind::Derived
    }

    /// Look up a column by its header name. Surrounding whitespace is ignored.
    pub fn from_header(name: &str) -> Option<ColumnKey> {
        let name = name.trim();
        ColumnKey::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column key: {0:?}")]
pub struct UnknownColumn(pub String);

impl FromStr for ColumnKey {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnKey::from_header(s).ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

impl TryFrom<String> for ColumnKey {
    type Error = UnknownColumn;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ColumnKey> for String {
    fn from(key: ColumnKey) -> Self {
        key.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for key in ColumnKey::ALL {
            assert_eq!(key.as_str().parse::<ColumnKey>(), Ok(key));
        }
    }

    #[test]
    fn five_derived_columns() {
        let derived: Vec<_> = ColumnKey::ALL.into_iter().filter(|k| k.is_derived()).collect();
        assert_eq!(
            derived,
            vec![
                ColumnKey::UsSpread,
                ColumnKey::DeSpread,
                ColumnKey::JpSpread,
                ColumnKey::JpUsSpread,
                ColumnKey::JpDeSpread,
            ]
        );
    }

    #[test]
    fn header_lookup_trims_and_rejects_unknown() {
        assert_eq!(ColumnKey::from_header(" CL=F "), Some(ColumnKey::CrudeOil));
        assert_eq!(ColumnKey::from_header("Date"), None);
        assert!("10ydey.b".parse::<ColumnKey>().is_err());
    }

    #[test]
    fn serializes_as_wire_name() {
        let json = serde_json::to_string(&ColumnKey::JpUsSpread).unwrap();
        assert_eq!(json, "\"JP_US_SPREAD\"");
        let back: ColumnKey = serde_json::from_str("\"XAUUSD\"").unwrap();
        assert_eq!(back, ColumnKey::Gold);
    }
}
