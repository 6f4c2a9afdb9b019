//! JSON Configuration Management
//!
//! Handles reading and writing the console configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{ConsoleConfig, ConsoleConfigUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_console_dir};

/// Environment variable holding the API token (never stored on disk).
pub const API_TOKEN_ENV: &str = "HASHTOPOLIS_API_TOKEN";

/// Configuration service for managing console settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: ConsoleConfig,
}

impl ConfigService {
    /// Create a new config service, loading existing config or creating defaults
    pub fn new() -> AppResult<Self> {
        ensure_console_dir()?;
        Self::open(config_path()?)
    }

    /// Open a config file at an explicit path, creating defaults if missing
    pub fn open(config_path: PathBuf) -> AppResult<Self> {
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = ConsoleConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            default_config
        };
        config.api_token = std::env::var(API_TOKEN_ENV).ok().filter(|t| !t.is_empty());

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<ConsoleConfig> {
        let content = fs::read_to_string(path)?;
        let config: ConsoleConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &ConsoleConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Get a clone of the current configuration
    pub fn get_config_clone(&self) -> ConsoleConfig {
        self.config.clone()
    }

    /// Update the configuration with a partial update
    pub fn update_config(&mut self, update: ConsoleConfigUpdate) -> AppResult<ConsoleConfig> {
        let mut next = self.config.clone();
        next.apply_update(update);
        Self::save_to_file(&self.config_path, &next)?;
        self.config = next;
        Ok(self.config.clone())
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Reload configuration from disk, keeping the in-memory token
    pub fn reload(&mut self) -> AppResult<()> {
        let token = self.config.api_token.take();
        self.config = Self::load_from_file(&self.config_path)?;
        self.config.api_token = token;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        let token = self.config.api_token.take();
        self.config = ConsoleConfig {
            api_token: token,
            ..ConsoleConfig::default()
        };
        self.save()?;
        Ok(())
    }
}
