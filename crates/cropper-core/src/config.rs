//! Uploader configuration.
//!
//! Every field is optional when deserialized; missing fields take the
//! defaults below. Field names follow the JavaScript component props, so a
//! props object can be passed through `serde-wasm-bindgen` unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::DEFAULT_ASPECT_RATIO;
use crate::validate::{megabytes_label, Constraints};

/// Default maximum upload size: 5 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Default output JPEG quality, matching `canvas.toBlob`.
pub const DEFAULT_OUTPUT_QUALITY: u8 = 92;

/// MIME types accepted when none are configured.
pub const DEFAULT_ACCEPTED_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Errors for configuration values that cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Aspect ratio must be a positive finite number, got {0}")]
    InvalidAspectRatio(f64),

    #[error("At least one accepted file type is required")]
    NoAcceptedTypes,

    #[error("Maximum file size must be greater than zero")]
    ZeroMaxSize,

    #[error("Output quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),
}

/// Options of one uploader instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploaderConfig {
    /// Width / height of the cropped output.
    pub aspect_ratio: f64,
    /// Largest accepted file, in bytes.
    #[serde(alias = "maxSize")]
    pub max_size_bytes: u64,
    /// Accepted MIME types.
    #[serde(alias = "acceptedFileTypes")]
    pub accepted_types: Vec<String>,
    /// JPEG quality of the output artifact (1-100).
    pub output_quality: u8,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            accepted_types: DEFAULT_ACCEPTED_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            output_quality: DEFAULT_OUTPUT_QUALITY,
        }
    }
}

impl UploaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        if self.accepted_types.is_empty() {
            return Err(ConfigError::NoAcceptedTypes);
        }
        if self.max_size_bytes == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }
        if !(1..=100).contains(&self.output_quality) {
            return Err(ConfigError::InvalidQuality(self.output_quality));
        }
        Ok(())
    }

    /// Validation constraints derived from this configuration.
    pub fn constraints(&self) -> Constraints {
        Constraints {
            accepted_types: self.accepted_types.clone(),
            max_size_bytes: self.max_size_bytes,
        }
    }

    /// Value for an `<input type="file" accept="...">` attribute.
    pub fn accept_attribute(&self) -> String {
        self.accepted_types.join(",")
    }

    /// Human-readable list of accepted extensions, e.g. `.jpeg, .png, .webp`.
    pub fn extensions_hint(&self) -> String {
        self.accepted_types
            .iter()
            .map(|t| t.replacen("image/", ".", 1))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Maximum size for display, e.g. `5MB`.
    pub fn max_size_label(&self) -> String {
        format!("{}MB", megabytes_label(&self.max_size_bytes))
    }
}
