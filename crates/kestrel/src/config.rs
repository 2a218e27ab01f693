//! # Engine Configuration
//!
//! Loaded from a TOML file exactly once at startup and validated before any
//! store or scheduler is built. There is no runtime reconfiguration -
//! capacity and tick rate are fixed for the life of the process.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading the engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but describes an unusable engine.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Startup configuration for the engine shell.
///
/// Every field has a default, so a partial (or absent) file is fine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Fixed entity capacity of the store. Never grows.
    pub max_entities: usize,
    /// Fixed-step simulation rate in ticks per second.
    pub tick_rate_hz: u32,
    /// Frame-time budget in milliseconds; slower frames are logged.
    pub max_frame_time_ms: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_entities: 10_000,
            tick_rate_hz: 60,
            max_frame_time_ms: 33.0,
        }
    }
}

impl EngineConfig {
    /// Loads and validates a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// validated.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text cannot be parsed or validated.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a usable engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid(
                "max_entities must be greater than zero".into(),
            ));
        }
        if self.max_entities > u32::MAX as usize {
            return Err(ConfigError::Invalid(
                "max_entities cannot exceed u32::MAX".into(),
            ));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid(
                "tick_rate_hz must be greater than zero".into(),
            ));
        }
        if self.max_frame_time_ms <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_frame_time_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Returns the fixed-step delta in seconds.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // tick rates are small integers
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.fixed_dt() - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = EngineConfig::from_toml_str("max_entities = 500").unwrap();
        assert_eq!(config.max_entities, 500);
        assert_eq!(config.tick_rate_hz, 60);
    }

    #[test]
    fn full_toml_roundtrip() {
        let text = r#"
            max_entities = 2048
            tick_rate_hz = 30
            max_frame_time_ms = 50.0
        "#;
        let config = EngineConfig::from_toml_str(text).unwrap();
        assert_eq!(
            config,
            EngineConfig {
                max_entities: 2048,
                tick_rate_hz: 30,
                max_frame_time_ms: 50.0,
            }
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = EngineConfig::from_toml_str("max_entities = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = EngineConfig::from_toml_str("entity_cap = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("max_entities = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
