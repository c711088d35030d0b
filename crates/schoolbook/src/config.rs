//! Configuration management for schoolbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

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
const DATA_DIR_NAME: &str = "schoolbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "schools.db";

/// Default key of the slot holding the school list.
pub const DEFAULT_SLOT_KEY: &str = "schools";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SCHOOLBOOK_`, sections split on `__`)
/// 2. TOML config file at `~/.config/schoolbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Image configuration.
    pub images: ImageConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/schoolbook/schools.db`
    pub database_path: Option<PathBuf>,
    /// Key of the slot that mirrors the school list.
    pub slot_key: String,
}

/// Image-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Largest image file accepted, in bytes.
    pub max_bytes: u64,
    /// File extensions accepted as images (lowercase, without the dot).
    pub extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            extensions: default_image_extensions(),
        }
    }
}

/// Default file extensions accepted as images.
fn default_image_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "avif"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SCHOOLBOOK_").split("__"));

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
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "slot_key must not be empty".to_string(),
            });
        }

        if self.images.max_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "max_bytes must be greater than 0".to_string(),
            });
        }

        if self.images.extensions.is_empty() {
            return Err(Error::ConfigValidation {
                message: "extensions must list at least one image type".to_string(),
            });
        }

        for ext in &self.images.extensions {
            if ext.is_empty() || ext.starts_with('.') || ext.chars().any(char::is_uppercase) {
                return Err(Error::ConfigValidation {
                    message: format!("invalid image extension: {ext:?} (use lowercase, no dot)"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the slot key.
    #[must_use]
    pub fn slot_key(&self) -> &str {
        &self.storage.slot_key
    }
}
