//! Expense lifecycle, id assignment, and the derived-data services built on top of it.

pub mod ids;
pub mod services;
pub mod store;
pub mod time;

pub use ids::IdAllocator;
pub use store::{ExpenseStore, StoreEvent};
pub use time::{Clock, SystemClock};
