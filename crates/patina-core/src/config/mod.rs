//! Configuration management for Patina.
//!
//! Configuration is loaded from the platform config directory with defaults
//! that reproduce the classic `old-photo` batch layout.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Patina.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manifest and output layout
    pub processing: ProcessingConfig,

    /// Shared paper texture
    pub texture: TextureConfig,

    /// Output encoding
    pub encode: EncodeConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.patina.patina/config.toml
    /// - Linux: ~/.config/patina/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\patina\config\config.toml
    ///
    /// Falls back to ~/.patina/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "patina", "patina")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".patina").join("config.toml")
            })
    }

    /// Resolved texture path (with ~ expansion).
    pub fn texture_path(&self) -> PathBuf {
        let path_str = self.texture.path.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }
}
