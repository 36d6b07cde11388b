use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    errors::{FlowError, Result},
    ledger::{reference_date, PeriodCalendar},
    utils::paths::{self, ensure_dir, write_atomic},
};

/// Number of periods shown by history views unless asked otherwise.
pub const DEFAULT_HISTORY_PERIODS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Anchor day periods are counted from. Period length itself is fixed.
    #[serde(default = "reference_date")]
    pub reference_date: NaiveDate,
    #[serde(default = "Config::default_history_periods")]
    pub history_periods: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            reference_date: reference_date(),
            history_periods: DEFAULT_HISTORY_PERIODS,
        }
    }
}

impl Config {
    pub fn calendar(&self) -> PeriodCalendar {
        PeriodCalendar::new(self.reference_date)
    }

    fn default_history_periods() -> usize {
        DEFAULT_HISTORY_PERIODS
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&paths::config_dir_in(&base))?;
        Ok(Self {
            path: paths::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data)
            .map_err(|err| FlowError::Config(format!("{}: {err}", self.path.display())))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.calendar(), PeriodCalendar::default());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            reference_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            history_periods: 3,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"locale":"en-GB","currency":"GBP"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency, "GBP");
        assert_eq!(config.reference_date, reference_date());
        assert_eq!(config.history_periods, DEFAULT_HISTORY_PERIODS);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "[]").unwrap();
        assert!(matches!(manager.load(), Err(FlowError::Config(_))));
    }
}
