//! Detector configuration
//!
//! Fixed for the lifetime of a detector. No `Default` impl: `detect_both_eyes`
//! must always be given by the caller.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{
    BlinkError, Result, DEFAULT_COOL_DOWN_SECS, DEFAULT_SENSITIVITY, RECOMMENDED_SENSITIVITY_MAX,
    RECOMMENDED_SENSITIVITY_MIN,
};

/// Immutable detector configuration
///
/// `validate` only accepts a sensitivity strictly between 0 and 1; a
/// threshold outside that range would make one eye always or never closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Closure boundary: confidence strictly above this counts as closed
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Minimum spacing between two emitted blinks
    #[serde(
        rename = "cool_down_secs",
        with = "duration_secs",
        default = "default_cool_down"
    )]
    pub cool_down: Duration,
    /// Report simultaneous closure as `Both` instead of dropping it
    pub detect_both_eyes: bool,
}

fn default_sensitivity() -> f32 {
    DEFAULT_SENSITIVITY
}

fn default_cool_down() -> Duration {
    Duration::from_secs_f64(DEFAULT_COOL_DOWN_SECS)
}

impl DetectorConfig {
    /// Config with default sensitivity and cooldown
    pub fn new(detect_both_eyes: bool) -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            cool_down: default_cool_down(),
            detect_both_eyes,
        }
    }

    /// Start a builder; `detect_both_eyes` is the one required choice
    pub fn builder(detect_both_eyes: bool) -> DetectorConfigBuilder {
        DetectorConfigBuilder {
            sensitivity: DEFAULT_SENSITIVITY,
            cool_down_secs: DEFAULT_COOL_DOWN_SECS,
            detect_both_eyes,
        }
    }

    /// Check every field against its domain
    pub fn validate(&self) -> Result<()> {
        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 || self.sensitivity >= 1.0 {
            return Err(BlinkError::InvalidConfig(format!(
                "sensitivity must be in (0, 1), got {}",
                self.sensitivity
            )));
        }
        Ok(())
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| BlinkError::ConfigIo {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| {
            BlinkError::ConfigParse {
                path: display,
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Cooldown in seconds
    pub fn cool_down_secs(&self) -> f64 {
        self.cool_down.as_secs_f64()
    }

    /// Sensitivity inside the 0.5-0.6 band that suits natural blinks
    pub fn has_recommended_sensitivity(&self) -> bool {
        (RECOMMENDED_SENSITIVITY_MIN..=RECOMMENDED_SENSITIVITY_MAX).contains(&self.sensitivity)
    }
}

/// Builder for `DetectorConfig`
#[derive(Debug, Clone)]
pub struct DetectorConfigBuilder {
    sensitivity: f32,
    cool_down_secs: f64,
    detect_both_eyes: bool,
}

impl DetectorConfigBuilder {
    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn cool_down(mut self, cool_down: Duration) -> Self {
        self.cool_down_secs = cool_down.as_secs_f64();
        self
    }

    pub fn cool_down_secs(mut self, secs: f64) -> Self {
        self.cool_down_secs = secs;
        self
    }

    pub fn build(self) -> Result<DetectorConfig> {
        let cool_down = Duration::try_from_secs_f64(self.cool_down_secs).map_err(|_| {
            BlinkError::InvalidConfig(format!(
                "cool-down must be a finite number of seconds >= 0, got {}",
                self.cool_down_secs
            ))
        })?;
        let config = DetectorConfig {
            sensitivity: self.sensitivity,
            cool_down,
            detect_both_eyes: self.detect_both_eyes,
        };
        config.validate()?;
        Ok(config)
    }
}

/// `Duration` as fractional seconds on the wire
mod duration_secs {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|_| D::Error::custom(format!("invalid cool_down_secs {}", secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = DetectorConfig::new(false);
        assert_eq!(config.sensitivity, 0.6);
        assert_eq!(config.cool_down, Duration::from_secs(1));
        assert!(!config.detect_both_eyes);
    }

    #[test]
    fn test_builder_overrides() {
        let config = DetectorConfig::builder(true)
            .sensitivity(0.5)
            .cool_down(Duration::from_millis(250))
            .build()
            .unwrap();
        assert_eq!(config.sensitivity, 0.5);
        assert_eq!(config.cool_down, Duration::from_millis(250));
        assert!(config.detect_both_eyes);
    }

    #[test]
    fn test_recommended_sensitivity() {
        assert!(DetectorConfig::new(false).has_recommended_sensitivity());
        let config = DetectorConfig::builder(false).sensitivity(0.35).build().unwrap();
        assert!(!config.has_recommended_sensitivity());
    }

    #[test]
    fn test_zero_cool_down_allowed() {
        let config = DetectorConfig::builder(false).cool_down_secs(0.0).build().unwrap();
        assert_eq!(config.cool_down, Duration::ZERO);
    }

    #[test]
    fn test_rejects_out_of_domain() {
        assert!(DetectorConfig::builder(false).sensitivity(0.0).build().is_err());
        assert!(DetectorConfig::builder(false).sensitivity(1.0).build().is_err());
        assert!(DetectorConfig::builder(false).sensitivity(f32::NAN).build().is_err());
        assert!(DetectorConfig::builder(false).cool_down_secs(-0.5).build().is_err());
        assert!(DetectorConfig::builder(false).cool_down_secs(f64::INFINITY).build().is_err());
    }

    #[test]
    fn test_json_defaults_and_rename() {
        let config: DetectorConfig = serde_json::from_str(r#"{"detect_both_eyes": true}"#).unwrap();
        assert_eq!(config, DetectorConfig::new(true));

        let json = serde_json::to_value(DetectorConfig::new(false)).unwrap();
        assert_eq!(json["cool_down_secs"], 1.0);
    }

    #[test]
    fn test_json_requires_both_eyes_choice() {
        let result: std::result::Result<DetectorConfig, _> =
            serde_json::from_str(r#"{"sensitivity": 0.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_rejects_negative_cool_down() {
        let result: std::result::Result<DetectorConfig, _> =
            serde_json::from_str(r#"{"detect_both_eyes": false, "cool_down_secs": -1.0}"#);
        assert!(result.is_err());
    }
}
