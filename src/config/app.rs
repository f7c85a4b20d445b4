//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! foos-ladder engine, including environment variable loading, TOML file
//! loading, and validation.

use crate::config::{RankTable, RatingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub store: StoreSettings,
    pub rating: RatingConfig,
    pub ranks: RankTable,
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

/// Player store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path of the line-oriented store file
    pub file: String,
    /// Minimum games before a player qualifies for the best-win-rate leader
    pub min_games_for_win_rate: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "foos-ladder".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            file: "elo.txt".to_string(),
            min_games_for_win_rate: 10,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(file) = env::var("STORE_FILE") {
            config.store.file = file;
        }
        if let Ok(min_games) = env::var("MIN_GAMES_FOR_WIN_RATE") {
            config.store.min_games_for_win_rate = min_games
                .parse()
                .map_err(|_| anyhow!("Invalid MIN_GAMES_FOR_WIN_RATE value: {}", min_games))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.store.file.is_empty() {
        return Err(anyhow!("Store file path cannot be empty"));
    }

    config.rating.validate()?;
    config.ranks.validate()?;

    Ok(())
}
