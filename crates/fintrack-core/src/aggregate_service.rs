//! Totals, per-category sums, and per-date series over a snapshot of entries.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fintrack_domain::{
    Amounted, CategoryOrder, CategoryTotal, DatedTotal, Kind, LedgerEntry, PieSlice, DATE_FORMAT,
};

/// Aggregated view of one income and one expense collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub total_income: f64,
    pub total_expenses: f64,
    pub by_date: Vec<DatedTotal>,
    pub income_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
}

impl Aggregate {
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Number of distinct dates observed across both collections.
    pub fn day_count(&self) -> usize {
        self.by_date.len()
    }
}

pub struct AggregateService;

impl AggregateService {
    pub fn aggregate(
        income: &[LedgerEntry],
        expenses: &[LedgerEntry],
        order: CategoryOrder,
    ) -> Aggregate {
        let aggregate = Aggregate {
            total_income: Self::total(income),
            total_expenses: Self::total(expenses),
            by_date: Self::by_date(income, expenses),
            income_by_category: Self::by_category(income, order),
            expense_by_category: Self::by_category(expenses, order),
        };
        tracing::debug!(
            income_entries = income.len(),
            expense_entries = expenses.len(),
            dates = aggregate.by_date.len(),
            "aggregated ledger snapshot"
        );
        aggregate
    }

    pub fn total(entries: &[LedgerEntry]) -> f64 {
        order_independent_sum(entries.iter().map(Amounted::amount).collect())
    }

    /// Groups entries by label, summing amounts per group.
    pub fn by_category(entries: &[LedgerEntry], order: CategoryOrder) -> Vec<CategoryTotal> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();

        for entry in entries {
            let index = *positions.entry(entry.label.as_str()).or_insert_with(|| {
                groups.push((entry.label.as_str(), Vec::new()));
                groups.len() - 1
            });
            groups[index].1.push(entry.amount());
        }

        let mut totals: Vec<CategoryTotal> = groups
            .into_iter()
            .map(|(label, amounts)| CategoryTotal::new(label, order_independent_sum(amounts)))
            .collect();
        if order == CategoryOrder::Alphabetical {
            totals.sort_by(|a, b| a.label.cmp(&b.label));
        }
        totals
    }

    /// Merges both collections by date, ascending.
    ///
    /// Dates in `YYYY-MM-DD` sort chronologically; anything else (including
    /// the unknown-date sentinel) sorts after them, lexicographically.
    pub fn by_date(income: &[LedgerEntry], expenses: &[LedgerEntry]) -> Vec<DatedTotal> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<DateGroup<'_>> = Vec::new();

        let tagged = income
            .iter()
            .map(|entry| (Kind::Income, entry))
            .chain(expenses.iter().map(|entry| (Kind::Expense, entry)));

        for (kind, entry) in tagged {
            let index = *positions.entry(entry.date.as_str()).or_insert_with(|| {
                groups.push(DateGroup::new(&entry.date));
                groups.len() - 1
            });
            groups[index].push(kind, entry.amount());
        }

        let mut rows: Vec<DatedTotal> = groups.into_iter().map(DateGroup::into_row).collect();
        rows.sort_by_cached_key(|row| date_sort_key(&row.date));
        rows
    }

    /// Income and expense slices for a pie chart, in that order.
    pub fn pie(aggregate: &Aggregate) -> [PieSlice; 2] {
        [
            PieSlice {
                kind: Kind::Income,
                value: aggregate.total_income,
            },
            PieSlice {
                kind: Kind::Expense,
                value: aggregate.total_expenses,
            },
        ]
    }

    /// Per-date net balance (income minus expenses) in series order.
    pub fn net_series(aggregate: &Aggregate) -> Vec<(String, f64)> {
        aggregate
            .by_date
            .iter()
            .map(|row| (row.date.clone(), row.net()))
            .collect()
    }
}

/// Amounts seen for one date, split by kind, summed once grouping is done.
struct DateGroup<'a> {
    date: &'a str,
    income: Vec<f64>,
    expenses: Vec<f64>,
}

impl<'a> DateGroup<'a> {
    fn new(date: &'a str) -> Self {
        Self {
            date,
            income: Vec::new(),
            expenses: Vec::new(),
        }
    }

    fn push(&mut self, kind: Kind, amount: f64) {
        match kind {
            Kind::Income => self.income.push(amount),
            Kind::Expense => self.expenses.push(amount),
        }
    }

    fn into_row(self) -> DatedTotal {
        DatedTotal {
            date: self.date.to_string(),
            income_sum: order_independent_sum(self.income),
            expense_sum: order_independent_sum(self.expenses),
        }
    }
}

/// Sums in ascending value order so the result is the same for any permutation.
fn order_independent_sum(mut amounts: Vec<f64>) -> f64 {
    amounts.sort_by(f64::total_cmp);
    amounts.into_iter().fold(0.0, |sum, amount| sum + amount)
}

/// Parseable dates first, by calendar day then spelling; the rest by spelling.
fn date_sort_key(date: &str) -> (bool, Option<NaiveDate>, String) {
    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT).ok();
    (parsed.is_none(), parsed, date.to_string())
}
