//! Engine configuration.
//!
//! All fields carry serde defaults so a partial JSON object (or `{}`) is a
//! valid configuration. The numeric invariants of the crop model (zoom and
//! offset ranges, minimum crop box side) are constants in
//! [`crate::geometry`] and deliberately not configurable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::FilterType;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    /// Validation error
    #[error(
        "Engine config validation failed:\n{}",
        .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n")
    )]
    Validation(Vec<String>),
}

/// Tunables for display geometry and rasterization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Maximum width of a platform preview container in logical px (default: 400)
    #[serde(default = "default_max_display_width")]
    pub max_display_width: f64,

    /// Maximum height of a platform preview container in logical px (default: 500)
    #[serde(default = "default_max_display_height")]
    pub max_display_height: f64,

    /// Default crop box size as a fraction of the container (default: 0.8)
    #[serde(default = "default_box_fraction")]
    pub default_box_fraction: f64,

    /// Upper bound for the default crop box width (default: 280)
    #[serde(default = "default_box_max_width")]
    pub default_box_max_width: f64,

    /// Upper bound for the default crop box height (default: 300)
    #[serde(default = "default_box_max_height")]
    pub default_box_max_height: f64,

    /// Resampling filter used when rasterizing (default: Lanczos3)
    #[serde(default)]
    pub filter: FilterType,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_display_width: default_max_display_width(),
            max_display_height: default_max_display_height(),
            default_box_fraction: default_box_fraction(),
            default_box_max_width: default_box_max_width(),
            default_box_max_height: default_box_max_height(),
            filter: FilterType::default(),
        }
    }
}

fn default_max_display_width() -> f64 {
    400.0
}

fn default_max_display_height() -> f64 {
    500.0
}

fn default_box_fraction() -> f64 {
    0.8
}

fn default_box_max_width() -> f64 {
    280.0
}

fn default_box_max_height() -> f64 {
    300.0
}

impl EngineConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is usable by the geometry code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let positive = [
            ("maxDisplayWidth", self.max_display_width),
            ("maxDisplayHeight", self.max_display_height),
            ("defaultBoxMaxWidth", self.default_box_max_width),
            ("defaultBoxMaxHeight", self.default_box_max_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{name} must be a positive number, got {value}"));
            }
        }

        if !(self.default_box_fraction > 0.0 && self.default_box_fraction <= 1.0) {
            errors.push(format!(
                "defaultBoxFraction must be in (0, 1], got {}",
                self.default_box_fraction
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
