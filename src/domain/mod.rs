//! Expense domain models and their persisted layout.

pub mod category;
pub mod expense;
pub mod theme;

pub use category::{canonical_category, is_standard_category, STANDARD_CATEGORIES};
pub use expense::{check_amount, ExpenseId, ExpenseInput, ExpenseRecord, MAX_AMOUNT};
pub use theme::Theme;
