//! Sub-configuration structs with defaults matching the legacy batch tool.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Manifest and output layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Name of the manifest file inside the input directory
    pub manifest_name: String,

    /// Output subdirectory, relative to the input directory
    pub output_dir: String,

    /// Accepted source extensions (compared case-sensitively)
    pub accepted_extensions: Vec<String>,

    /// Upper bound on the worker count accepted from the command line
    pub max_workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            manifest_name: "image-list.txt".to_string(),
            output_dir: "Old-image-dir".to_string(),
            accepted_extensions: vec!["jpg".to_string(), "jpeg".to_string()],
            max_workers: 1024,
        }
    }
}

/// Paper texture composited over every photograph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Path to the texture image; relative paths resolve against the
    /// working directory
    pub path: PathBuf,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./paper-texture.png"),
        }
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self { jpeg_quality: 70 }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: 10000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
