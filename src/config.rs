//! Category table and move policy configuration.
//!
//! Configuration is optional. When present it is stored in TOML:
//!
//! ```toml
//! case_sensitive = false
//! max_copy_attempts = 1000
//!
//! [[categories]]
//! name = "audio"
//! extensions = [".mp3", ".wav", ".flac"]
//!
//! [[categories]]
//! name = "image"
//! extensions = ["jpg", "jpeg", "png", "gif"]
//! ```
//!
//! Categories keep the order they are written in; the first match wins.
//! Leaving `categories` out keeps the built-in audio, image and video table.

use crate::file_category::{Category, CategoryMapping, ExtensionCase};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default upper bound on `_copy(N)` candidates tried for one file.
pub const DEFAULT_MAX_COPY_ATTEMPTS: u32 = 1000;

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// The file parsed but its values make no sense.
    #[error("Invalid configuration value: {0}")]
    Validation(String),
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Settings deserialized from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediasortConfig {
    /// Compare extensions exactly as written. Defaults to false.
    #[serde(default)]
    pub case_sensitive: bool,

    /// How many `_copy(N)` names to try before giving up on a file.
    #[serde(default = "default_max_copy_attempts")]
    pub max_copy_attempts: u32,

    /// Ordered category table.
    #[serde(default = "CategoryMapping::default_categories")]
    pub categories: Vec<Category>,
}

fn default_max_copy_attempts() -> u32 {
    DEFAULT_MAX_COPY_ATTEMPTS
}

impl MediasortConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.mediasortrc.toml` in the current directory
    /// 3. Look for `~/.config/mediasort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any file found fails to parse or validate.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".mediasortrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("mediasort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), categories = config.categories.len(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_copy_attempts == 0 {
            return Err(ConfigError::Validation(
                "max_copy_attempts must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name().trim().is_empty() {
                return Err(ConfigError::Validation(
                    "category names must not be empty".to_string(),
                ));
            }
            if !seen.insert(category.dir_name()) {
                return Err(ConfigError::Validation(format!(
                    "category '{}' is defined more than once",
                    category.name()
                )));
            }
        }
        Ok(())
    }

    /// Builds the immutable mapping handed to the organizer.
    pub fn mapping(&self) -> CategoryMapping {
        let case = if self.case_sensitive {
            ExtensionCase::Sensitive
        } else {
            ExtensionCase::Insensitive
        };
        let categories = self
            .categories
            .iter()
            .map(|c| Category::new(c.name(), c.extensions()))
            .collect();
        CategoryMapping::new(categories, case)
    }
}

impl Default for MediasortConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            max_copy_attempts: DEFAULT_MAX_COPY_ATTEMPTS,
            categories: CategoryMapping::default_categories(),
        }
    }
}
