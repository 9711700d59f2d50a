use thiserror::Error;

use crate::domain::ExpenseId;

/// Failures surfaced by the expense store and its persistence collaborator.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Invalid expense: {0}")]
    Validation(String),
    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;

impl ExpenseError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ExpenseError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ExpenseError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ExpenseError::NotFound(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, ExpenseError::Persistence(_))
    }
}

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        ExpenseError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        ExpenseError::Persistence(err.to_string())
    }
}
