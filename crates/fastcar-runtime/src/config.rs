#![forbid(unsafe_code)]

//! Carousel configuration and configuration errors.
//!
//! [`CarouselConfig`] groups every tunable of the carousel. It can be built in
//! code or, with the `config-files` feature, loaded from TOML or JSON:
//!
//! ```toml
//! # carousel.toml
//! duration_ms = 200
//! width = 320
//! background_color = "#101010"
//! keyboard_throttle_ms = 150
//! ```
//!
//! ```rust,ignore
//! let config = CarouselConfig::from_toml_file("carousel.toml")?;
//! let config = CarouselConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `CarouselConfig::default()` gives a 150 ms transition, a slide width taken
//! from the measured container, a 150 ms keyboard throttle, a 10 ms drag-move
//! throttle and a 50 ms resize debounce.

#[cfg(feature = "config-files")]
use std::path::Path;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};

use fastcar_core::animation::DEFAULT_DURATION_MS;
use web_time::Duration;

/// Every tunable of a carousel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct CarouselConfig {
    /// Transition duration in milliseconds. Zero or negative is instant.
    pub duration_ms: f64,

    /// Fixed slide width in pixels; measured from the container when absent.
    pub width: Option<f64>,

    /// Background color handed through to the host untouched.
    pub background_color: Option<String>,

    /// Minimum spacing between keyboard navigation actions.
    pub keyboard_throttle_ms: u64,

    /// Minimum spacing between processed drag moves.
    pub drag_throttle_ms: u64,

    /// Quiet period after the last resize before the width is recomputed.
    pub resize_debounce_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            width: None,
            background_color: None,
            keyboard_throttle_ms: 150,
            drag_throttle_ms: 10,
            resize_debounce_ms: 50,
        }
    }
}

impl CarouselConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config-files")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    /// Zero and negative durations are valid: they make transitions instant.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.duration_ms.is_nan() || self.duration_ms.is_infinite() {
            errors.push(format!("duration_ms must be finite, got {}", self.duration_ms));
        }

        if let Some(width) = self.width {
            if !width.is_finite() || width < 0.0 {
                errors.push(format!("width must be a finite, non-negative number, got {width}"));
            }
        }

        errors
    }

    /// `self` if valid, otherwise the validation errors.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Keyboard throttle as a duration.
    #[must_use]
    pub fn keyboard_throttle(&self) -> Duration {
        Duration::from_millis(self.keyboard_throttle_ms)
    }

    /// Drag-move throttle as a duration.
    #[must_use]
    pub fn drag_throttle(&self) -> Duration {
        Duration::from_millis(self.drag_throttle_ms)
    }

    /// Resize debounce as a duration.
    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Errors raised while configuring a carousel.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[cfg(feature = "config-files")]
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON parse error.
    #[cfg(feature = "config-files")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more parameters are out of range.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// No viewport collaborator was supplied.
    #[error("carousel requires a viewport: call `CarouselBuilder::viewport` before `build`")]
    MissingViewport,

    /// No data source was supplied.
    #[error("carousel requires a data source: call `CarouselBuilder::data_source` before `build`")]
    MissingDataSource,
}
