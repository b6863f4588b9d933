use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::combat::{ActionBudget, TurnOptions};

const APP_DIR: &str = "ttrpg-campaign-core";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub combat: CombatConfig,
    pub logging: LoggingConfig,
}

/// Turn-advance behavior of the combat engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CombatConfig {
    /// Step over defeated entries when moving the turn pointer.
    pub skip_defeated: bool,
    /// Rewinding from the first turn goes back into the previous round.
    pub previous_wraps_round: bool,
    /// Refill an entry's actions when its turn begins.
    pub reset_actions_on_turn: bool,
    pub action_budget: ActionBudget,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
    /// Write the JSON file log alongside terminal output.
    pub json_file: bool,
}

impl Default for CombatConfig {
    fn default() -> Self {
        let turn = TurnOptions::default();
        Self {
            skip_defeated: turn.skip_defeated,
            previous_wraps_round: turn.previous_wraps_round,
            reset_actions_on_turn: turn.reset_actions_on_turn,
            action_budget: turn.action_budget,
        }
    }
}

impl CombatConfig {
    pub fn turn_options(&self) -> TurnOptions {
        TurnOptions {
            skip_defeated: self.skip_defeated,
            previous_wraps_round: self.previous_wraps_round,
            reset_actions_on_turn: self.reset_actions_on_turn,
            action_budget: self.action_budget,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            json_file: true,
        }
    }
}

impl LoggingConfig {
    /// Resolved log directory (override or platform data dir).
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(APP_DIR).join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

impl AppConfig {
    /// Load configuration from `<config dir>/ttrpg-campaign-core/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            log::debug!("No config file at {}, using defaults", config_path.display());
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
