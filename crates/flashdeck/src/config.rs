//! Configuration management for flashdeck.
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
const DATA_DIR_NAME: &str = "flashdeck";

/// Default credential file name.
const USERS_FILE_NAME: &str = "users.json";

/// Default flashcard file name.
const FLASHCARDS_FILE_NAME: &str = "flashcards.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLASHDECK_`, nested keys
///    separated by `__`, e.g. `FLASHDECK_STORAGE__DATA_DIR`)
/// 2. TOML config file at `~/.config/flashdeck/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Flashcard collection configuration.
    pub flashcards: FlashcardsConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding both record files.
    /// Defaults to `~/.local/share/flashdeck`
    pub data_dir: Option<PathBuf>,
    /// Path to the credential file.
    /// Defaults to `<data_dir>/users.json`
    pub users_file: Option<PathBuf>,
    /// Path to the flashcard file.
    /// Defaults to `<data_dir>/flashcards.json`
    pub flashcards_file: Option<PathBuf>,
}

/// Flashcard collection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashcardsConfig {
    /// Fall back to the built-in example cards when the flashcard file is
    /// missing or unreadable. When off, the fallback is an empty list.
    pub seed_examples: bool,
}

impl Default for FlashcardsConfig {
    fn default() -> Self {
        Self {
            seed_examples: true,
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
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLASHDECK_").split("__"));

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
        if self.users_path() == self.flashcards_path() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "users_file and flashcards_file both resolve to {}",
                    self.users_path().display()
                ),
            });
        }

        for (name, path) in [
            ("users_file", &self.storage.users_file),
            ("flashcards_file", &self.storage.flashcards_file),
        ] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must not be empty"),
                });
            }
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

    /// Get the credential file path, resolving defaults if not set.
    #[must_use]
    pub fn users_path(&self) -> PathBuf {
        self.storage
            .users_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join(USERS_FILE_NAME))
    }

    /// Get the flashcard file path, resolving defaults if not set.
    #[must_use]
    pub fn flashcards_path(&self) -> PathBuf {
        self.storage
            .flashcards_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join(FLASHCARDS_FILE_NAME))
    }

    /// Build a configuration rooted at `data_dir` with default file names.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig {
                data_dir: Some(data_dir.into()),
                ..StorageConfig::default()
            },
            ..Self::default()
        }
    }
}
