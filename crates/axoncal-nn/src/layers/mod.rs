//! Neural Network Layers
//!
//! Standard layers that calibration passes typically instrument.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod activation;
pub mod conv;
pub mod dropout;
pub mod linear;
pub mod norm;

// Re-exports
pub use activation::ReLU;
pub use conv::Conv1d;
pub use dropout::Dropout;
pub use linear::Linear;
pub use norm::BatchNorm1d;
