//! Cross-Platform Path Utilities
//!
//! Functions for resolving the console's configuration directory.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the console directory (~/.hashtopolis-console/)
pub fn console_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".hashtopolis-console"))
}

/// Get the config file path (~/.hashtopolis-console/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(console_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the console directory, creating if it doesn't exist
pub fn ensure_console_dir() -> AppResult<PathBuf> {
    let path = console_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
