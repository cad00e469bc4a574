use std::path::PathBuf;

use budget_domain::{is_billing_day, DayTable, MIN_BILLING_DAY};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DATA_DIR_NAME: &str = "wallet-budget";

/// Runtime settings shared by every front end embedding the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom storage root. Defaults to `<data dir>/wallet-budget`.
    pub data_root: Option<PathBuf>,
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
    #[serde(default = "Config::default_month_start_value")]
    pub default_month_start: u32,
    #[serde(default)]
    pub day_table: DayTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: None,
            log_filter: Self::default_log_filter(),
            default_month_start: Self::default_month_start_value(),
            day_table: DayTable::default(),
        }
    }
}

impl Config {
    pub fn default_log_filter() -> String {
        "wallet_budget=info,budget_core=info,budget_storage_json=info".into()
    }

    pub fn default_month_start_value() -> u32 {
        MIN_BILLING_DAY
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_billing_day(self.default_month_start) {
            return Err(ConfigError::Invalid(format!(
                "default_month_start must be between 1 and 28, got {}",
                self.default_month_start
            )));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log_filter must not be empty".into()));
        }
        Ok(())
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(DATA_DIR_NAME)
    }
}
