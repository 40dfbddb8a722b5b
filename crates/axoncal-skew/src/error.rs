//! Activation Analysis Error Types
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use thiserror::Error;

/// Result type for activation analysis.
pub type SkewResult<T> = Result<T, SkewError>;

/// Errors that can occur while analyzing activations.
#[derive(Error, Debug)]
pub enum SkewError {
    /// The calibration source has no first batch to evaluate.
    #[error("Calibration source is empty: no batch at index 0")]
    EmptyCalibrationSource,

    /// Relocation or the forward pass failed; the inner error is unchanged.
    #[error("Model execution failed: {0}")]
    Execution(#[from] axoncal_core::Error),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SkewError {
    fn from(e: toml::de::Error) -> Self {
        SkewError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for SkewError {
    fn from(e: serde_json::Error) -> Self {
        SkewError::Serialization(e.to_string())
    }
}
