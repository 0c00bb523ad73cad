//! Configuration file handling for `~/.barbermap/config.ini`.
//!
//! Loads and saves user configuration with sensible defaults. Settings
//! structs live in [`settings`], parsing in `parser`, serialization in
//! `writer`.

mod parser;
mod settings;
mod writer;

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

pub use settings::*;

use crate::orchestrator::OrchestratorConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (`~/.barbermap/config.ini`).
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }

    /// Derive the orchestrator configuration from the `[search]` section.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            debounce: Duration::from_millis(self.search.debounce_ms),
            seed_delay: Duration::from_millis(self.search.seed_delay_ms),
            seed_enabled: self.search.seed_enabled,
            default_center: self.search.default_center,
        }
    }
}

/// Get the path to the config directory (`~/.barbermap`).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".barbermap")
}

/// Get the path to the config file (`~/.barbermap/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
