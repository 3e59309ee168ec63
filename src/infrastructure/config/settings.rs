//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; API keys are never stored in it
//! and are read from the environment by the adapters that need them.
//!
//! # Example
//!
//! ```no_run
//! use honeylab::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::collection::{CollectionConfig, ResolutionConfig};
use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use super::market::MarketConfig;
use crate::domain::{AssetDefinition, AssetRegistry};
use crate::error::{ConfigError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root of the partitioned prediction ledger and stats artifacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// SQLite file holding the classification cache.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub collection: CollectionConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub market: MarketConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    /// Extra registry entries appended to the built-in assets.
    #[serde(default)]
    pub assets: Vec<AssetDefinition>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("honeylab.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database: default_database_path(),
            logging: LoggingConfig::default(),
            collection: CollectionConfig::default(),
            resolution: ResolutionConfig::default(),
            market: MarketConfig::default(),
            llm: LlmConfig::default(),
            assets: Vec::new(),
        }
    }
}

impl Config {
    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.collection.channel_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "collection.channel_id",
            }
            .into());
        }
        if self.collection.days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "collection.days",
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        if self.resolution.window_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "resolution.window_hours",
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        if self.market.crypto.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "market.crypto.timeout_secs",
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        if self.market.daily.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "market.daily.timeout_secs",
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        if self.market.daily.program.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "market.daily.program",
            }
            .into());
        }
        if let Err(e) = self.registry() {
            return Err(ConfigError::InvalidValue {
                field: "assets",
                reason: e.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Built-in registry extended with the configured `[[assets]]`.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra entry is blank or reuses a label.
    pub fn registry(&self) -> Result<AssetRegistry> {
        Ok(AssetRegistry::builtin().extended(self.assets.clone())?)
    }

    /// Initialize the global tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
