//! Error Types - axoncal Core Error Handling
//!
//! Errors raised by tensor operations, device handling and module execution.
//! Higher-level crates wrap this type rather than re-declaring its variants.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

use crate::device::Device;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for axoncal operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape mismatch between tensors.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },

    /// Device mismatch between tensors.
    #[error("Device mismatch: expected {expected}, got {actual}")]
    DeviceMismatch {
        /// The expected device.
        expected: Device,
        /// The actual device.
        actual: Device,
    },

    /// A device string that could not be parsed.
    #[error("Invalid device: {0:?}")]
    InvalidDevice(String),

    /// Invalid operation for the given tensor or module.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for axoncal operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates a new device mismatch error.
    #[must_use]
    pub fn device_mismatch(expected: Device, actual: Device) -> Self {
        Self::DeviceMismatch { expected, actual }
    }

    /// Creates a new invalid device error.
    #[must_use]
    pub fn invalid_device(name: impl Into<String>) -> Self {
        Self::InvalidDevice(name.into())
    }

    /// Creates a new invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
