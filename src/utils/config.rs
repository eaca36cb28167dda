use crate::core::{
    DEFAULT_CACHE_FILE_NAME, DEFAULT_CROSSFADE_SECS, DEFAULT_DETAIL_OPACITY, DEFAULT_DETAIL_RADIUS_MILES,
    DEFAULT_VISIBILITY_RADIUS_MILES,
};
use crate::validation::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Proximity policy and overlay presentation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Buildings at or beyond this distance are hidden (miles)
    pub visibility_radius_miles: f64,
    /// Buildings at or within this distance show their detail card (miles)
    pub detail_radius_miles: f64,
    /// Label/detail cross-fade duration (seconds)
    pub crossfade_duration_secs: f64,
    /// Opacity a representation fades in to
    pub detail_opacity: f64,
    /// File name of the cached buildings dataset
    pub cache_file_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            visibility_radius_miles: DEFAULT_VISIBILITY_RADIUS_MILES,
            detail_radius_miles: DEFAULT_DETAIL_RADIUS_MILES,
            crossfade_duration_secs: DEFAULT_CROSSFADE_SECS,
            detail_opacity: DEFAULT_DETAIL_OPACITY,
            cache_file_name: DEFAULT_CACHE_FILE_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    /// Default config with custom radii
    pub fn with_radii(visibility_radius_miles: f64, detail_radius_miles: f64) -> Result<Self, ConfigError> {
        let config = Self {
            visibility_radius_miles,
            detail_radius_miles,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file; absent keys take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: EngineConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }

    /// Check every parameter, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_radius("visibility_radius_miles", self.visibility_radius_miles)?;
        positive_radius("detail_radius_miles", self.detail_radius_miles)?;

        if self.detail_radius_miles > self.visibility_radius_miles {
            return Err(ConfigError::RadiusOrder {
                detail: self.detail_radius_miles,
                visibility: self.visibility_radius_miles,
            });
        }

        if !self.crossfade_duration_secs.is_finite() || self.crossfade_duration_secs < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "crossfade_duration_secs",
                value: self.crossfade_duration_secs,
                reason: "duration must be finite and non-negative",
            });
        }

        if !(0.0..=1.0).contains(&self.detail_opacity) {
            return Err(ConfigError::InvalidParameter {
                parameter: "detail_opacity",
                value: self.detail_opacity,
                reason: "opacity must be within [0, 1]",
            });
        }

        let name = self.cache_file_name.as_str();
        if name.trim().is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(ConfigError::InvalidCacheFileName { name: name.to_string() });
        }

        Ok(())
    }

    /// Change the visibility radius, returning the previous value
    pub fn set_visibility_radius(&mut self, radius_miles: f64) -> Result<f64, ConfigError> {
        let candidate = Self {
            visibility_radius_miles: radius_miles,
            ..self.clone()
        };
        candidate.validate()?;
        Ok(std::mem::replace(&mut self.visibility_radius_miles, radius_miles))
    }

    /// Change the detail radius, returning the previous value
    pub fn set_detail_radius(&mut self, radius_miles: f64) -> Result<f64, ConfigError> {
        let candidate = Self {
            detail_radius_miles: radius_miles,
            ..self.clone()
        };
        candidate.validate()?;
        Ok(std::mem::replace(&mut self.detail_radius_miles, radius_miles))
    }
}

fn positive_radius(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            parameter,
            value,
            reason: "radius must be finite and positive",
        });
    }
    Ok(())
}
