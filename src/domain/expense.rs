//! Domain types representing a single recorded expense.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ExpenseError, Result};

/// Largest amount a single expense may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Amounts are whole cents.
pub const AMOUNT_SCALE: u32 = 2;

/// Store-assigned identifier. Millisecond-scale integers, unique within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub i64);

impl ExpenseId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExpenseId {
    type Err = ExpenseError;

    fn from_str(value: &str) -> Result<Self> {
        value
            .trim()
            .parse::<i64>()
            .map(ExpenseId)
            .map_err(|_| ExpenseError::invalid(format!("`{}` is not an expense id", value)))
    }
}

/// Caller-supplied fields for creating or replacing an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseInput {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

impl ExpenseInput {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date,
        }
    }

    /// Builds an input from raw form text. Empty or malformed fields are validation errors.
    pub fn parse(description: &str, amount: &str, category: &str, date: &str) -> Result<Self> {
        let amount = amount.trim();
        if amount.is_empty() {
            return Err(ExpenseError::invalid("amount is required"));
        }
        let amount = Decimal::from_str(amount)
            .map_err(|_| ExpenseError::invalid(format!("`{}` is not a valid amount", amount)))?;

        let date = date.trim();
        if date.is_empty() {
            return Err(ExpenseError::invalid("date is required"));
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            ExpenseError::invalid(format!("invalid date `{}` (use YYYY-MM-DD)", date))
        })?;

        Self::new(description, amount, category, date).validated()
    }

    /// Checks every field and returns the normalized (trimmed) input.
    pub fn validated(self) -> Result<Self> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ExpenseError::invalid("description must not be empty"));
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ExpenseError::invalid("category must not be empty"));
        }
        check_amount(self.amount)?;
        Ok(Self {
            description: description.to_string(),
            amount: self.amount,
            category: category.to_string(),
            date: self.date,
        })
    }
}

/// Amounts must be positive, at most [`MAX_AMOUNT`], and carry no more than two decimals.
/// Within those bounds the float representation on disk reads back exactly.
pub fn check_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::invalid("amount must be greater than zero"));
    }
    if amount > MAX_AMOUNT {
        return Err(ExpenseError::invalid(format!(
            "amount must not exceed {}",
            MAX_AMOUNT
        )));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ExpenseError::invalid(format!(
            "amount `{}` has more than {} decimal places",
            amount, AMOUNT_SCALE
        )));
    }
    Ok(())
}

/// A persisted expense entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    /// Creation or last-modification time; informational only.
    #[serde(rename = "timestamp", alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Expects an input that already passed [`ExpenseInput::validated`].
    pub(crate) fn from_input(id: ExpenseId, input: ExpenseInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            description: input.description,
            amount: input.amount,
            category: input.category,
            date: input.date,
            created_at,
        }
    }

    pub(crate) fn apply(&mut self, input: ExpenseInput, modified_at: DateTime<Utc>) {
        self.description = input.description;
        self.amount = input.amount;
        self.category = input.category;
        self.date = input.date;
        self.created_at = modified_at;
    }

    /// Returns the editable fields, e.g. to prefill an edit form.
    pub fn to_input(&self) -> ExpenseInput {
        ExpenseInput::new(
            self.description.clone(),
            self.amount,
            self.category.clone(),
            self.date,
        )
    }
}
