//! Config - Activation Analysis Settings
//!
//! Settings can be built in code or read from TOML:
//!
//! ```toml
//! targets = ["conv", "attn.proj"]
//! device = "cuda:0"
//!
//! [stats]
//! epsilon = 1e-6
//! convention = "population"
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::path::Path;

use axoncal_core::Device;
use serde::{Deserialize, Serialize};

use crate::error::{SkewError, SkewResult};
use crate::stats::StatConfig;

// =============================================================================
// AnalyzeConfig
// =============================================================================

/// Settings for one activation analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    /// Substrings selecting the layers to observe.
    #[serde(default)]
    pub targets: Vec<String>,

    /// Device the model and calibration batch are moved to.
    #[serde(default = "default_device")]
    pub device: String,

    /// Statistics parameters.
    #[serde(default)]
    pub stats: StatConfig,
}

fn default_device() -> String {
    "cpu".to_string()
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            device: default_device(),
            stats: StatConfig::default(),
        }
    }
}

impl AnalyzeConfig {
    /// Creates a configuration observing layers matching `targets` on CPU.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the target device.
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    /// Sets the statistics parameters.
    pub fn with_stats(mut self, stats: StatConfig) -> Self {
        self.stats = stats;
        self
    }

    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(content: &str) -> SkewResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file and validates it.
    pub fn load(path: impl AsRef<Path>) -> SkewResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Returns the parsed target device.
    pub fn device(&self) -> SkewResult<Device> {
        self.device
            .parse()
            .map_err(|e: axoncal_core::Error| SkewError::Config(e.to_string()))
    }

    /// Checks the device string and the statistics parameters.
    pub fn validate(&self) -> SkewResult<()> {
        self.device()?;
        if !self.stats.epsilon.is_finite() || self.stats.epsilon <= 0.0 {
            return Err(SkewError::Config(format!(
                "stats.epsilon must be a positive finite number, got {}",
                self.stats.epsilon
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{StdConvention, SKEW_EPSILON};

    #[test]
    fn test_defaults() {
        let config = AnalyzeConfig::new(["conv"]);
        assert_eq!(config.targets, vec!["conv".to_string()]);
        assert_eq!(config.device().unwrap(), Device::Cpu);
        assert_eq!(config.stats.epsilon, SKEW_EPSILON);
        assert_eq!(config.stats.convention, StdConvention::Population);
    }

    #[test]
    fn test_from_toml() {
        let config = AnalyzeConfig::from_toml_str(
            r#"
            targets = ["conv", "fc"]
            device = "cuda:1"

            [stats]
            convention = "sample"
            "#,
        )
        .unwrap();

        assert_eq!(config.targets, vec!["conv", "fc"]);
        assert_eq!(config.device().unwrap(), Device::Cuda(1));
        assert_eq!(config.stats.convention, StdConvention::Sample);
        assert_eq!(config.stats.epsilon, SKEW_EPSILON);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AnalyzeConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalyzeConfig::default());
    }

    #[test]
    fn test_invalid_device() {
        let err = AnalyzeConfig::from_toml_str("device = \"tpu:0\"").unwrap_err();
        assert!(matches!(err, SkewError::Config(_)));
    }

    #[test]
    fn test_invalid_epsilon() {
        let config = AnalyzeConfig::new(["conv"]).with_stats(StatConfig {
            epsilon: 0.0,
            ..StatConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = AnalyzeConfig::from_toml_str("targets = conv").unwrap_err();
        assert!(matches!(err, SkewError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnalyzeConfig::load("/nonexistent/axoncal.toml").unwrap_err();
        assert!(matches!(err, SkewError::Io(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AnalyzeConfig::new(["attn"]).with_device("cuda:0");
        let text = toml::to_string(&config).unwrap();
        assert_eq!(AnalyzeConfig::from_toml_str(&text).unwrap(), config);
    }
}
