use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseSortError {
    kind: &'static str,
    value: String,
}

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// A sortable column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "revenue")]
    Revenue,
    #[serde(rename = "netIncome")]
    NetIncome,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Date, SortKey::Revenue, SortKey::NetIncome];

    /// Wire name, as used by the provider payload and the proxy.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Revenue => "revenue",
            SortKey::NetIncome => "netIncome",
        }
    }

    /// Column header label.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::Revenue => "Revenue",
            SortKey::NetIncome => "Net Income",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "revenue" => Ok(SortKey::Revenue),
            "netIncome" | "net_income" => Ok(SortKey::NetIncome),
            other => Err(ParseSortError {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Arrow glyph shown next to the active column header.
    pub fn arrow(&self) -> char {
        match self {
            SortOrder::Ascending => '↑',
            SortOrder::Descending => '↓',
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => Err(ParseSortError {
                kind: "sort order",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// SortSpec
// ---------------------------------------------------------------------------

/// The active sort column and direction. Starts as date ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// The spec after a click on column `clicked`: the active column flips
    /// direction, any other column becomes active in ascending order.
    pub fn toggle(self, clicked: SortKey) -> Self {
        if clicked == self.key {
            Self {
                key: self.key,
                order: self.order.flipped(),
            }
        } else {
            Self {
                key: clicked,
                order: SortOrder::Ascending,
            }
        }
    }

    /// Arrow for `key` when it is the active column.
    pub fn indicator(&self, key: SortKey) -> Option<char> {
        (key == self.key).then(|| self.order.arrow())
    }
}
