//! axoncal-skew - Activation Distribution Analysis for Quantization
//!
//! Runs a single calibration batch through an instrumented model and
//! reports, per selected layer, the distribution of the activations it
//! produced: mean, standard deviation, range and skewness. Heavily skewed
//! layers are poor candidates for symmetric quantization ranges.
//!
//! # Key Components
//!
//! - **StatRecord**: mean, std, min, max and skewness of one activation
//! - **make_skew_hook / ResultsStore**: hook that records statistics into
//!   a shared store
//! - **LayerMatcher**: selects layers by substring of their dotted name
//! - **SkewAnalyzer / analyze_skew**: one instrumented evaluation pass with
//!   guaranteed hook cleanup
//! - **ActivationStats**: the per-layer result, as JSON or a text table
//! - **AnalyzeConfig**: TOML-backed analysis settings
//!
//! # Example
//!
//! ```
//! use axoncal_core::{Device, Tensor};
//! use axoncal_data::VecDataset;
//! use axoncal_nn::prelude::*;
//! use axoncal_skew::analyze_skew;
//!
//! let mut model = Sequential::new()
//!     .add_named("fc1", Linear::new(4, 8))
//!     .add_named("act", ReLU::new())
//!     .add_named("fc2", Linear::new(8, 2));
//! let calib = VecDataset::from_inputs(vec![Tensor::uniform(&[32, 4], -1.0, 1.0)]);
//!
//! let stats = analyze_skew(&mut model, &calib, &["fc", "act"], Device::Cpu).unwrap();
//! assert_eq!(stats.len(), 3);
//!
//! let act = stats.get("act").unwrap();
//! assert!(act.min >= 0.0);
//! println!("{stats}");
//! ```
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// ML/tensor-specific allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analyze;
pub mod config;
pub mod error;
pub mod matcher;
pub mod observer;
pub mod report;
pub mod stats;

// =============================================================================
// Re-exports
// =============================================================================

pub use analyze::{analyze_skew, ObservationScope, SkewAnalyzer};
pub use config::AnalyzeConfig;
pub use error::{SkewError, SkewResult};
pub use matcher::{match_layers, matches_any, LayerMatcher};
pub use observer::{activation_sample, make_skew_hook, ResultsStore};
pub use report::ActivationStats;
pub use stats::{StatConfig, StatRecord, StdConvention, SKEW_EPSILON};

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for activation analysis.
pub mod prelude {
    pub use crate::analyze::{analyze_skew, SkewAnalyzer};
    pub use crate::config::AnalyzeConfig;
    pub use crate::error::{SkewError, SkewResult};
    pub use crate::matcher::LayerMatcher;
    pub use crate::report::ActivationStats;
    pub use crate::stats::{StatConfig, StatRecord};
}
