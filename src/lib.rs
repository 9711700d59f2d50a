#![doc(test(attr(deny(warnings))))]

//! Expense Tracker keeps a single user's expense records in a local key-value store and
//! derives the totals, category breakdowns, and monthly trends a dashboard displays.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::services::AggregationEngine;
pub use crate::core::store::ExpenseStore;
pub use crate::domain::{ExpenseId, ExpenseInput, ExpenseRecord};
pub use crate::errors::{ExpenseError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense tracker tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
