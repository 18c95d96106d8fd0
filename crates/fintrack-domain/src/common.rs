//! Shared sentinels, the amount contract, and the entry kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label substituted when an entry carries no category or source.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Date substituted when a stored entry carries no date.
pub const UNKNOWN_DATE: &str = "Unknown";

/// Canonical on-disk/on-wire date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Determines which aggregate bucket an entry contributes to.
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Income, Kind::Expense];

    /// Name of the document collection holding entries of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expenses",
        }
    }

    /// Raw record key carrying the label for this kind.
    pub fn label_key(self) -> &'static str {
        match self {
            Kind::Income => "source",
            Kind::Expense => "category",
        }
    }

    pub fn other(self) -> Kind {
        match self {
            Kind::Income => Kind::Expense,
            Kind::Expense => Kind::Income,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Kind::Income => "Income",
            Kind::Expense => "Expenses",
        };
        f.write_str(label)
    }
}
