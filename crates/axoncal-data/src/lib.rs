//! axoncal-data - Calibration Data Sources
//!
//! Provides indexed access to `(input, label)` pairs. Calibration only
//! ever reads the input of the first pair, but sources are ordinary
//! datasets so the same type can back evaluation code as well.
//!
//! # Example
//!
//! ```
//! use axoncal_core::Tensor;
//! use axoncal_data::{Dataset, VecDataset};
//!
//! let batch = Tensor::ones(&[8, 4]);
//! let labels = Tensor::zeros(&[8]);
//! let source = VecDataset::new(vec![(batch, labels)]);
//!
//! let (input, _label) = source.get(0).unwrap();
//! assert_eq!(input.shape(), &[8, 4]);
//! assert!(source.get(1).is_none());
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod dataset;

pub use dataset::{Dataset, Sample, TensorDataset, VecDataset};
