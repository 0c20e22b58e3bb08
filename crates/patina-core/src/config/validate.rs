//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.manifest_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.manifest_name must not be empty".into(),
            ));
        }
        if self.processing.output_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.output_dir must not be empty".into(),
            ));
        }
        if self.processing.accepted_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.accepted_extensions must list at least one extension".into(),
            ));
        }
        if self.processing.max_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.max_workers must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.encode.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "encode.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.texture.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "texture.path must not be empty".into(),
            ));
        }
        Ok(())
    }
}
