//! Application configuration loaded from JSON.

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Default pixel scale factor for windowed displays.
const DEFAULT_SCALE: u32 = 2;

/// Default frame interval (~30 FPS).
const DEFAULT_FRAME_INTERVAL_MS: u64 = 33;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    /// Route path opened on top of the sensor list at startup,
    /// e.g. `sensorDetail/%7B%22name%22...`.
    pub deep_link: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub scale: u32,
    pub frame_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("config is malformed at line {line}, column {column}")]
    Malformed { line: usize, column: usize },
    #[error("display scale must be at least 1")]
    ZeroScale,
}

impl AppConfig {
    /// Parse a configuration document. Missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json).map_err(|e| ConfigError::Malformed {
            line: e.line(),
            column: e.column(),
        })?;

        if config.display.scale == 0 {
            return Err(ConfigError::ZeroScale);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.display.scale, 2);
        assert_eq!(config.display.frame_interval_ms, 33);
        assert!(config.deep_link.is_none());
    }

    #[test]
    fn test_partial_display_section() {
        let config =
            AppConfig::from_json(r#"{"display":{"scale":3},"deep_link":"sensorList"}"#).unwrap();
        assert_eq!(config.display.scale, 3);
        assert_eq!(config.display.frame_interval_ms, 33);
        assert_eq!(config.deep_link.as_deref(), Some("sensorList"));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let err = AppConfig::from_json(r#"{"display":{"scale":0}}"#).unwrap_err();
        assert_eq!(err, ConfigError::ZeroScale);
    }

    #[test]
    fn test_malformed_document() {
        let err = AppConfig::from_json(r#"{"display":"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line: 1, .. }));
    }
}
