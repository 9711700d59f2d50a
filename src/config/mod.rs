//! Persistent shell settings.

mod error;
mod manager;
mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, CONFIG_KEYS};
