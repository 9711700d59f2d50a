use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::ExpenseRecord;
use crate::errors::{ExpenseError, Result};

/// Short month names indexed like [`AggregationEngine::monthly_trend`].
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Optional criteria combined with logical AND. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn matches(&self, expense: &ExpenseRecord) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| expense.category == category);
        let date_ok = self.date.map_or(true, |date| expense.date == date);
        category_ok && date_ok
    }
}

/// Headline figures shown above the expense table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total: Decimal,
    pub current_month: Decimal,
    pub category_count: usize,
    pub expense_count: usize,
}

/// Derived views over a snapshot. Every function is pure; nothing is cached.
/// Sums are checked: a total beyond `Decimal`'s range is a validation error.
pub struct AggregationEngine;

fn add_amounts(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| ExpenseError::invalid("expense total exceeds the supported range"))
}

impl AggregationEngine {
    pub fn filter_by<'a>(
        snapshot: &'a [ExpenseRecord],
        filter: &ExpenseFilter,
    ) -> Vec<&'a ExpenseRecord> {
        snapshot
            .iter()
            .filter(|expense| filter.matches(expense))
            .collect()
    }

    pub fn total_amount<'a, I>(snapshot: I) -> Result<Decimal>
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        snapshot
            .into_iter()
            .try_fold(Decimal::ZERO, |total, expense| add_amounts(total, expense.amount))
    }

    /// Sum of records dated in the same calendar month and year as `reference`.
    pub fn current_month_total(snapshot: &[ExpenseRecord], reference: NaiveDate) -> Result<Decimal> {
        Self::total_amount(snapshot.iter().filter(|expense| {
            expense.date.year() == reference.year() && expense.date.month() == reference.month()
        }))
    }

    pub fn distinct_category_count(snapshot: &[ExpenseRecord]) -> usize {
        snapshot
            .iter()
            .map(|expense| expense.category.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Per-category totals, ordered by category name.
    pub fn category_breakdown(snapshot: &[ExpenseRecord]) -> Result<BTreeMap<String, Decimal>> {
        let mut breakdown = BTreeMap::new();
        for expense in snapshot {
            let entry = breakdown
                .entry(expense.category.clone())
                .or_insert(Decimal::ZERO);
            *entry = add_amounts(*entry, expense.amount)?;
        }
        Ok(breakdown)
    }

    /// Each category's percentage of the overall total, rounded to one decimal place.
    /// Empty when the snapshot is empty.
    pub fn category_shares(snapshot: &[ExpenseRecord]) -> Result<BTreeMap<String, Decimal>> {
        let total = Self::total_amount(snapshot)?;
        if total.is_zero() {
            return Ok(BTreeMap::new());
        }
        Ok(Self::category_breakdown(snapshot)?
            .into_iter()
            .map(|(category, amount)| {
                // amount <= total, so the ratio is at most one.
                let share = (amount / total * Decimal::ONE_HUNDRED).round_dp(1);
                (category, share)
            })
            .collect())
    }

    /// Totals for January through December of `year`. Months without records are zero.
    pub fn monthly_trend(snapshot: &[ExpenseRecord], year: i32) -> Result<[Decimal; 12]> {
        let mut months = [Decimal::ZERO; 12];
        for expense in snapshot.iter().filter(|expense| expense.date.year() == year) {
            let month = &mut months[expense.date.month0() as usize];
            *month = add_amounts(*month, expense.amount)?;
        }
        Ok(months)
    }

    pub fn summarize(snapshot: &[ExpenseRecord], today: NaiveDate) -> Result<DashboardSummary> {
        Ok(DashboardSummary {
            total: Self::total_amount(snapshot)?,
            current_month: Self::current_month_total(snapshot, today)?,
            category_count: Self::distinct_category_count(snapshot),
            expense_count: snapshot.len(),
        })
    }
}
