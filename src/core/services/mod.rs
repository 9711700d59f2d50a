pub mod aggregation;
pub mod demo;
pub mod export;
pub mod preferences;

pub use aggregation::{AggregationEngine, DashboardSummary, ExpenseFilter, MONTH_LABELS};
pub use demo::demo_expenses;
pub use export::CsvExporter;
pub use preferences::PreferenceService;
