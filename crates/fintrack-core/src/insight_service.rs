use serde::{Deserialize, Serialize};

use crate::Aggregate;

/// Scalar metrics derived from an [`Aggregate`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub total_balance: f64,
    pub avg_daily_income: f64,
    pub avg_daily_expense: f64,
}

impl Insights {
    pub fn is_in_surplus(&self) -> bool {
        self.total_balance >= 0.0
    }
}

pub struct InsightService;

impl InsightService {
    /// Balance and per-day averages. Averages divide by at least one day.
    pub fn summarize(aggregate: &Aggregate) -> Insights {
        let days = aggregate.day_count().max(1) as f64;
        Insights {
            total_balance: aggregate.total_income - aggregate.total_expenses,
            avg_daily_income: aggregate.total_income / days,
            avg_daily_expense: aggregate.total_expenses / days,
        }
    }
}
