use chrono::{DateTime, Utc};

use crate::domain::ExpenseId;
use crate::errors::{ExpenseError, Result};

/// Hands out timestamp-derived ids that never repeat, even when the clock stalls.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: Option<i64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes after the highest id already in use.
    pub fn starting_after(highest: Option<ExpenseId>) -> Self {
        Self {
            last: highest.map(ExpenseId::value),
        }
    }

    /// Returns the clock's millisecond value, or one past the previous id if that is larger.
    /// Fails once the previous id is `i64::MAX` and the clock cannot supply a larger one.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<ExpenseId> {
        let candidate = now.timestamp_millis();
        let id = match self.last {
            Some(last) if candidate <= last => last.checked_add(1).ok_or_else(|| {
                ExpenseError::invalid(format!("no expense ids remain after {}", last))
            })?,
            _ => candidate,
        };
        self.last = Some(id);
        Ok(ExpenseId(id))
    }

    pub fn last(&self) -> Option<ExpenseId> {
        self.last.map(ExpenseId)
    }
}
