// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default animation tempo (animation milliseconds per wall-clock millisecond)
pub const DEFAULT_TEMPO: f64 = 1.5;

/// Construction parameters for a playback model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Scale applied to elapsed wall-clock time while moving.
    ///
    /// Fixed for the lifetime of a model.
    pub tempo: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
        }
    }
}

impl PlaybackConfig {
    /// Config with the given tempo
    pub fn with_tempo(tempo: f64) -> Self {
        Self { tempo }
    }

    /// Check that the values can drive a model
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tempo.is_finite() || self.tempo <= 0.0 {
            return Err(ConfigError::InvalidTempo(self.tempo));
        }
        Ok(())
    }

    /// Parse and validate a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: PlaybackConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Pretty RON representation
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }
}
