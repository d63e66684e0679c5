//! Main application configuration
//!
//! This module defines the primary configuration structures for squad-forge,
//! including environment variable loading, TOML file loading and validation.

use crate::config::rating::RatingConfig;
use crate::config::teams::TeamConfig;
use crate::error::RosterError;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub teams: TeamConfig,
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where player data lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Bundled player data file, used as the data source
    pub data_file: PathBuf,
    /// Directory holding the local snapshots
    pub local_dir: PathBuf,
    /// Start without connectivity to the data source
    pub offline: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "squad-forge".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/players.json"),
            local_dir: PathBuf::from(".squad-forge"),
            offline: false,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Storage settings
        if let Ok(data_file) = env::var("SQUAD_DATA_FILE") {
            self.storage.data_file = PathBuf::from(data_file);
        }
        if let Ok(local_dir) = env::var("SQUAD_LOCAL_DIR") {
            self.storage.local_dir = PathBuf::from(local_dir);
        }
        if let Ok(offline) = env::var("SQUAD_OFFLINE") {
            self.storage.offline = parse_var("SQUAD_OFFLINE", &offline)?;
        }

        // Team settings
        if let Ok(min) = env::var("MIN_TEAM_COUNT") {
            self.teams.min_team_count = parse_var("MIN_TEAM_COUNT", &min)?;
        }
        if let Ok(max) = env::var("MAX_TEAM_COUNT") {
            self.teams.max_team_count = parse_var("MAX_TEAM_COUNT", &max)?;
        }

        // Rating settings
        if let Ok(step) = env::var("SKILL_STEP") {
            self.rating.skill_step = parse_var("SKILL_STEP", &step)?;
        }
        if let Ok(step) = env::var("INTERACTION_STEP") {
            self.rating.interaction_step = parse_var("INTERACTION_STEP", &step)?;
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> anyhow::Error {
    RosterError::ConfigurationError {
        message: message.into(),
    }
    .into()
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(config_error(format!(
                "Invalid log level: {}",
                config.service.log_level
            )))
        }
    }

    // Validate storage settings
    if config.storage.data_file.as_os_str().is_empty() {
        return Err(config_error("Data file path cannot be empty"));
    }
    if config.storage.local_dir.as_os_str().is_empty() {
        return Err(config_error("Local snapshot directory cannot be empty"));
    }

    // Validate team settings
    let teams = &config.teams;
    if teams.min_team_count < 2 || teams.max_team_count > 10 {
        return Err(config_error("Team counts must stay within 2 and 10"));
    }
    if teams.min_team_count > teams.max_team_count {
        return Err(config_error("Minimum team count exceeds maximum team count"));
    }
    if teams.min_players_per_team == 0 {
        return Err(config_error("Players per team must be greater than 0"));
    }

    // Validate rating settings
    if config.rating.skill_step <= 0.0 || config.rating.interaction_step <= 0.0 {
        return Err(config_error("Rating steps must be positive"));
    }

    Ok(())
}
