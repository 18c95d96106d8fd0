//! Derived report rows produced by aggregation. Never persisted.

use serde::{Deserialize, Serialize};

use crate::common::Kind;

/// Income and expense sums for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatedTotal {
    pub date: String,
    pub income_sum: f64,
    pub expense_sum: f64,
}

impl DatedTotal {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            income_sum: 0.0,
            expense_sum: 0.0,
        }
    }

    /// Income minus expenses for the date.
    pub fn net(&self) -> f64 {
        self.income_sum - self.expense_sum
    }
}

/// Summed amount for one label within a single kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub label: String,
    pub total: f64,
}

impl CategoryTotal {
    pub fn new(label: impl Into<String>, total: f64) -> Self {
        Self {
            label: label.into(),
            total,
        }
    }
}

/// One slice of the income-versus-expenses pie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PieSlice {
    pub kind: Kind,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_is_income_minus_expenses() {
        let row = DatedTotal {
            date: "2025-01-01".into(),
            income_sum: 100.0,
            expense_sum: 45.0,
        };
        assert_eq!(row.net(), 55.0);
        assert_eq!(DatedTotal::new("2025-01-02").net(), 0.0);
    }

    #[test]
    fn dated_total_uses_camel_case_keys() {
        let json = serde_json::to_value(DatedTotal::new("2025-01-01")).unwrap();
        assert!(json.get("incomeSum").is_some());
        assert!(json.get("expenseSum").is_some());
    }
}
