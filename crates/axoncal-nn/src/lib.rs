//! axoncal-nn - Instrumentable Neural Network Modules
//!
//! Provides the module abstraction that calibration passes run against,
//! together with the forward-hook machinery used to observe activations
//! without altering them.
//!
//! # Key Components
//!
//! - **Module trait**: forward pass, hook dispatch, named children,
//!   device relocation and train/eval switching
//! - **ForwardHooks / HookHandle**: per-module hook registry and the
//!   handle that detaches a hook again
//! - **Sequential**: named container running children in order
//! - **Layers**: Linear, Conv1d, ReLU, Dropout, BatchNorm1d
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use axoncal_core::Tensor;
//! use axoncal_nn::prelude::*;
//!
//! let model = Sequential::new()
//!     .add_named("fc1", Linear::new(4, 8))
//!     .add_named("act", ReLU::new())
//!     .add_named("fc2", Linear::new(8, 2));
//!
//! let names: Vec<String> = named_modules(&model).into_iter().map(|(n, _)| n).collect();
//! assert_eq!(names, vec!["", "fc1", "act", "fc2"]);
//!
//! let handle = model.register_forward_hook(Arc::new(|_input: &Tensor, output: &Tensor| {
//!     assert_eq!(output.shape(), &[1, 2]);
//! }));
//! let input = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[1, 4]).unwrap();
//! model.call(&input).unwrap();
//! handle.remove();
//! assert_eq!(attached_hook_count(&model), 0);
//! ```
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

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
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::return_self_not_must_use)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod hooks;
pub mod layers;
pub mod module;
pub mod sequential;

// =============================================================================
// Re-exports
// =============================================================================

pub use hooks::{ForwardHook, ForwardHooks, HookHandle};
pub use layers::{BatchNorm1d, Conv1d, Dropout, Linear, ReLU};
pub use module::{attached_hook_count, named_modules, Module};
pub use sequential::Sequential;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for building and instrumenting models.
pub mod prelude {
    pub use crate::hooks::{ForwardHook, ForwardHooks, HookHandle};
    pub use crate::layers::{BatchNorm1d, Conv1d, Dropout, Linear, ReLU};
    pub use crate::module::{attached_hook_count, named_modules, Module};
    pub use crate::sequential::Sequential;
}
