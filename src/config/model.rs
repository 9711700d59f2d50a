use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ConfigError;

/// Keys accepted by [`Config::set_value`].
pub const CONFIG_KEYS: [&str; 4] = ["currency_symbol", "seed_demo_data", "data_dir", "export_dir"];

/// User-tunable settings for the expense tracker shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_seed_demo_data")]
    pub seed_demo_data: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory holding the key-value files. Defaults to `<app dir>/store`.
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Default destination for CSV exports. Defaults to the working directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            seed_demo_data: Self::default_seed_demo_data(),
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    pub fn default_seed_demo_data() -> bool {
        true
    }

    pub fn resolve_data_dir(&self, app_dir: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| app_dir.join("store"))
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Updates one setting from its textual form. `none` clears the optional paths.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "currency_symbol" => {
                if value.is_empty() {
                    return Err(invalid());
                }
                self.currency_symbol = value.to_string();
            }
            "seed_demo_data" => {
                self.seed_demo_data = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(invalid()),
                };
            }
            "data_dir" => self.data_dir = optional_path(value).ok_or_else(invalid)?,
            "export_dir" => self.export_dir = optional_path(value).ok_or_else(invalid)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// `(key, display value)` pairs in [`CONFIG_KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let path_or_default = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(default)".into())
        };
        vec![
            ("currency_symbol", self.currency_symbol.clone()),
            ("seed_demo_data", self.seed_demo_data.to_string()),
            ("data_dir", path_or_default(&self.data_dir)),
            ("export_dir", path_or_default(&self.export_dir)),
        ]
    }
}

fn optional_path(value: &str) -> Option<Option<PathBuf>> {
    if value.is_empty() {
        None
    } else if value.eq_ignore_ascii_case("none") {
        Some(None)
    } else {
        Some(Some(PathBuf::from(value)))
    }
}
