//! Analytics configuration
//!
//! Bounds a caller applies before invoking the statistics functions: forecast
//! horizon limits, how many recent observations make up a training window,
//! and whether results are rounded for presentation. The statistics functions
//! themselves do not enforce any of these.
//!
//! # Example
//!
//! ```rust
//! use meteo_stats::config::AnalyticsConfig;
//!
//! let config = AnalyticsConfig::from_toml_str("horizon_steps = 12\ntraining_window = 48").unwrap();
//! assert_eq!(config.horizon_steps, 12);
//! assert!(config.check_horizon(200).is_err());
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::window::ObservationWindow;

/// Configuration for forecast and window bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Forecast steps used when the caller does not ask for a specific horizon
    pub horizon_steps: usize,
    /// Smallest accepted horizon
    pub min_horizon_steps: usize,
    /// Largest accepted horizon
    pub max_horizon_steps: usize,
    /// Number of most recent observations used for analysis
    pub training_window: usize,
    /// Whether results are rounded to presentation precision
    pub round_output: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            horizon_steps: 24,
            min_horizon_steps: 1,
            max_horizon_steps: 168,
            training_window: 168,
            round_output: true,
        }
    }
}

impl AnalyticsConfig {
    /// Parse from TOML
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: AnalyticsConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from YAML
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: AnalyticsConfig = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from JSON
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: AnalyticsConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml`, `.yaml`/`.yml` or `.json` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(Error::Format(format!(
                "unsupported configuration file: {}",
                path.display()
            ))),
        }
    }

    /// Check that the bounds are consistent
    pub fn validate(&self) -> Result<()> {
        if self.min_horizon_steps == 0 {
            return Err(Error::InvalidInput(
                "min_horizon_steps must be at least 1".into(),
            ));
        }
        if self.min_horizon_steps > self.max_horizon_steps {
            return Err(Error::InvalidInput(format!(
                "min_horizon_steps ({}) exceeds max_horizon_steps ({})",
                self.min_horizon_steps, self.max_horizon_steps
            )));
        }
        self.check_horizon(self.horizon_steps)?;
        if self.training_window < 2 {
            return Err(Error::InvalidInput(format!(
                "training_window must be at least 2, got {}",
                self.training_window
            )));
        }
        Ok(())
    }

    /// Accept a requested horizon if it is within bounds
    pub fn check_horizon(&self, steps: usize) -> Result<usize> {
        if steps < self.min_horizon_steps || steps > self.max_horizon_steps {
            return Err(Error::InvalidInput(format!(
                "horizon of {} steps is outside {}..={}",
                steps, self.min_horizon_steps, self.max_horizon_steps
            )));
        }
        Ok(steps)
    }

    /// The most recent `training_window` observations, order preserved
    pub fn training_slice(&self, window: &ObservationWindow) -> ObservationWindow {
        if window.len() > self.training_window {
            log::debug!(
                "trimming window of {} records to the latest {}",
                window.len(),
                self.training_window
            );
        }
        window.tail(self.training_window)
    }
}

/// Builder for AnalyticsConfig
#[derive(Debug, Default)]
pub struct AnalyticsConfigBuilder {
    config: AnalyticsConfig,
}

impl AnalyticsConfigBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        AnalyticsConfigBuilder {
            config: AnalyticsConfig::default(),
        }
    }

    /// Sets the default horizon
    pub fn horizon_steps(mut self, steps: usize) -> Self {
        self.config.horizon_steps = steps;
        self
    }

    /// Sets the accepted horizon range
    pub fn horizon_bounds(mut self, min: usize, max: usize) -> Self {
        self.config.min_horizon_steps = min;
        self.config.max_horizon_steps = max;
        self
    }

    /// Sets the training window length
    pub fn training_window(mut self, records: usize) -> Self {
        self.config.training_window = records;
        self
    }

    /// Sets presentation rounding
    pub fn round_output(mut self, round: bool) -> Self {
        self.config.round_output = round;
        self
    }

    /// Builds and validates the config
    pub fn build(self) -> Result<AnalyticsConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon_steps, 24);
        assert_eq!(config.max_horizon_steps, 168);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalyticsConfig::from_toml_str("round_output = false").unwrap();
        assert!(!config.round_output);
        assert_eq!(config.training_window, 168);
    }

    #[test]
    fn test_yaml_and_json() {
        let yaml = AnalyticsConfig::from_yaml_str("horizon_steps: 6\nmax_horizon_steps: 48\n").unwrap();
        assert_eq!(yaml.horizon_steps, 6);
        assert_eq!(yaml.max_horizon_steps, 48);

        let json = AnalyticsConfig::from_json_str(r#"{"training_window": 24}"#).unwrap();
        assert_eq!(json.training_window, 24);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(AnalyticsConfig::from_toml_str("horizon_steps = 500").is_err());
        assert!(AnalyticsConfig::from_toml_str("training_window = 1").is_err());
        assert!(AnalyticsConfigBuilder::new().horizon_bounds(10, 5).build().is_err());
        assert!(matches!(
            AnalyticsConfig::from_toml_str("horizon_steps = \"many\""),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_check_horizon() {
        let config = AnalyticsConfigBuilder::new()
            .horizon_bounds(2, 72)
            .horizon_steps(12)
            .build()
            .unwrap();
        assert_eq!(config.check_horizon(2).unwrap(), 2);
        assert_eq!(config.check_horizon(72).unwrap(), 72);
        assert!(config.check_horizon(1).is_err());
        assert!(config.check_horizon(73).is_err());
    }
}
