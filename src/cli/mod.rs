//! Terminal shell over the expense store.

pub mod commands;
pub mod context;
pub mod format;
pub mod help;
pub mod io;
pub mod output;
mod shell;
pub mod ui;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;

/// Set to run commands from stdin without the line editor.
pub const SCRIPT_ENV: &str = "EXPENSE_TRACKER_CLI_SCRIPT";
