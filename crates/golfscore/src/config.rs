//! Configuration management for golfscore.
//!
//! Only file locations are configurable. Round defaults (player count, hole
//! count, par) are fixed so that a reset always lands on the same state.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "golfscore";

/// Default round state file name.
const STATE_FILE_NAME: &str = "state.bin";

/// Default history log file name.
const HISTORY_FILE_NAME: &str = "history.csv";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GOLFSCORE_`, nested keys split on `__`)
/// 2. TOML config file at `~/.config/golfscore/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Where the round state and history live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding both files.
    /// Defaults to `~/.local/share/golfscore`
    pub data_dir: Option<PathBuf>,
    /// File name of the round state inside `data_dir`.
    pub state_file: String,
    /// File name of the history log inside `data_dir`.
    pub history_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            state_file: STATE_FILE_NAME.to_string(),
            history_file: HISTORY_FILE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("GOLFSCORE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a file name is empty, contains a path separator,
    /// or both files would share the same name.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("state_file", &self.storage.state_file),
            ("history_file", &self.storage.history_file),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{key} must not be empty"),
                });
            }
            if value.contains(['/', '\\']) {
                return Err(Error::ConfigValidation {
                    message: format!("{key} must be a file name, not a path: {value}"),
                });
            }
        }

        if self.storage.state_file == self.storage.history_file {
            return Err(Error::ConfigValidation {
                message: format!(
                    "state_file and history_file must differ (both are {})",
                    self.storage.state_file
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the round state path.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.state_file)
    }

    /// Get the history log path.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.history_file)
    }
}
