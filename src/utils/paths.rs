use dirs::home_dir;
use std::{env, path::PathBuf};

/// Environment variable that relocates every file the tracker writes.
pub const HOME_ENV: &str = "EXPENSE_TRACKER_HOME";

const DEFAULT_DIR_NAME: &str = ".expense_tracker";

/// Returns the application data directory, defaulting to `~/.expense_tracker`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
