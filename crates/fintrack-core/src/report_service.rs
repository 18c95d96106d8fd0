use serde::{Deserialize, Serialize};
use serde_json::Value;

use fintrack_domain::{CategoryOrder, Kind, LedgerEntry, NegativeAmountPolicy, ReportOptions};

use crate::{Aggregate, AggregateService, CoreError, InsightService, Insights, NormalizeService};

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Report {
    #[serde(flatten)]
    pub aggregate: Aggregate,
    pub insights: Insights,
}

pub struct ReportService;

impl ReportService {
    pub fn build(income: &[LedgerEntry], expenses: &[LedgerEntry], order: CategoryOrder) -> Report {
        let aggregate = AggregateService::aggregate(income, expenses, order);
        let insights = InsightService::summarize(&aggregate);
        Report {
            aggregate,
            insights,
        }
    }

    /// Builds from already normalized entries, re-applying the negative-amount policy.
    pub fn build_with_options(
        income: &[LedgerEntry],
        expenses: &[LedgerEntry],
        options: &ReportOptions,
    ) -> Report {
        match options.negative_amounts {
            NegativeAmountPolicy::PassThrough => Self::build(income, expenses, options.category_order),
            policy => Self::build(
                &clamp(income, policy),
                &clamp(expenses, policy),
                options.category_order,
            ),
        }
    }

    /// Normalizes two raw JSON collections and builds the report from them.
    pub fn build_from_snapshots(
        income: &Value,
        expenses: &Value,
        options: &ReportOptions,
    ) -> Result<Report, CoreError> {
        let income =
            NormalizeService::normalize_snapshot(income, Kind::Income, options.negative_amounts)?;
        let expenses =
            NormalizeService::normalize_snapshot(expenses, Kind::Expense, options.negative_amounts)?;
        Ok(Self::build(&income, &expenses, options.category_order))
    }
}

fn clamp(entries: &[LedgerEntry], policy: NegativeAmountPolicy) -> Vec<LedgerEntry> {
    entries
        .iter()
        .map(|entry| LedgerEntry {
            amount: policy.apply(entry.amount),
            ..entry.clone()
        })
        .collect()
}
