//! axoncal Core - Foundation Layer for the axoncal Calibration Toolkit
//!
//! Provides the primitives every other axoncal crate builds on: compute
//! device identifiers, the shared error type, a shaped `f32` tensor with
//! device placement and gradient tracking, and the `no_grad` scope used
//! during calibration passes.
//!
//! # Key Features
//! - Device abstraction (`cpu`, `cuda:N`) with string parsing
//! - Host-backed tensors that remember their placement
//! - Thread-local gradient mode with RAII guards
//!
//! # Example
//! ```rust
//! use axoncal_core::{no_grad, Device, Tensor};
//!
//! let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
//! let moved = t.to_device("cuda:0".parse::<Device>().unwrap());
//! assert_eq!(moved.device(), Device::Cuda(0));
//!
//! let flat = no_grad(|| moved.detach().cpu().flatten());
//! assert_eq!(flat.shape(), &[4]);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// ML/tensor-specific allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]

// =============================================================================
// Modules
// =============================================================================

pub mod device;
pub mod error;
pub mod grad;
pub mod tensor;

// =============================================================================
// Re-exports
// =============================================================================

pub use device::Device;
pub use error::{Error, Result};
pub use grad::{is_grad_enabled, no_grad, NoGradGuard};
pub use tensor::{Shape, Tensor};

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::device::Device;
    pub use crate::error::{Error, Result};
    pub use crate::grad::{is_grad_enabled, no_grad, NoGradGuard};
    pub use crate::tensor::Tensor;
}
