//! Dropout Layers - Regularization via Random Zeroing
//!
//! Randomly zeros elements during training to prevent overfitting.
//! In evaluation mode the input passes through unchanged.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use axoncal_core::{Result, Tensor};
use rand::Rng;

use crate::hooks::ForwardHooks;
use crate::module::Module;

// =============================================================================
// Dropout
// =============================================================================

/// During training, randomly zeros some elements with probability p.
///
/// During evaluation, returns input unchanged.
#[derive(Debug)]
pub struct Dropout {
    p: f32,
    training: bool,
    hooks: ForwardHooks,
}

impl Dropout {
    /// Creates a new Dropout layer with the given probability.
    ///
    /// # Panics
    /// Panics if `p` is not in `[0, 1)`.
    pub fn new(p: f32) -> Self {
        assert!(
            (0.0..1.0).contains(&p),
            "Dropout probability must be in [0, 1)"
        );
        Self {
            p,
            training: true,
            hooks: ForwardHooks::new(),
        }
    }

    /// Returns the dropout probability.
    pub fn p(&self) -> f32 {
        self.p
    }
}

impl Default for Dropout {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Module for Dropout {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        if !self.training || self.p == 0.0 {
            return Ok(input.clone());
        }

        let mut rng = rand::thread_rng();
        // Scale factor for inverted dropout
        let scale = 1.0 / (1.0 - self.p);

        let data: Vec<f32> = input
            .as_slice()
            .iter()
            .map(|&x| if rng.gen::<f32>() < self.p { 0.0 } else { x * scale })
            .collect();

        Tensor::from_op(data, input.shape(), input.device(), &[input])
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }

    fn name(&self) -> &'static str {
        "Dropout"
    }
}

// =============================================================================
// Tests
// =============================================================================
