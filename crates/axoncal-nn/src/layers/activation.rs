//! Activation Modules - Non-linear Activation Functions
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use axoncal_core::{Result, Tensor};

use crate::hooks::ForwardHooks;
use crate::module::Module;

// =============================================================================
// ReLU
// =============================================================================

/// Applies the rectified linear unit function element-wise.
///
/// ReLU(x) = max(0, x)
#[derive(Debug, Default)]
pub struct ReLU {
    hooks: ForwardHooks,
}

impl ReLU {
    /// Creates a new ReLU activation.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for ReLU {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        Ok(input.map(|x| x.max(0.0)))
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }

    fn name(&self) -> &'static str {
        "ReLU"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu() {
        let relu = ReLU::new();
        let input = Tensor::from_vec(vec![-1.0, 0.0, 2.5], &[3]).unwrap();
        assert_eq!(relu.forward(&input).unwrap().to_vec(), vec![0.0, 0.0, 2.5]);
    }
}
