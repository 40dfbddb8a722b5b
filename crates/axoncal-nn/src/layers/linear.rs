//! Linear Layer - Fully Connected Layer
//!
//! Applies a linear transformation: y = xW^T + b
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use axoncal_core::{Device, Error, Result, Tensor};

use crate::hooks::ForwardHooks;
use crate::module::Module;

// =============================================================================
// Linear
// =============================================================================

/// Applies a linear transformation to the input.
///
/// # Shape
/// - Input: (*, in_features) where * means any number of dimensions
/// - Output: (*, out_features)
pub struct Linear {
    /// Weight matrix of shape (out_features, in_features).
    pub weight: Tensor,
    /// Bias vector of shape (out_features).
    pub bias: Option<Tensor>,
    in_features: usize,
    out_features: usize,
    hooks: ForwardHooks,
}

impl Linear {
    /// Creates a new Linear layer with bias.
    pub fn new(in_features: usize, out_features: usize) -> Self {
        Self::with_bias(in_features, out_features, true)
    }

    /// Creates a new Linear layer with optional bias.
    ///
    /// Weights are drawn from U(-1/sqrt(in), 1/sqrt(in)); the bias starts at zero.
    pub fn with_bias(in_features: usize, out_features: usize, bias: bool) -> Self {
        let bound = 1.0 / (in_features.max(1) as f32).sqrt();
        let weight = Tensor::uniform(&[out_features, in_features], -bound, bound)
            .with_requires_grad(true);
        let bias = bias.then(|| Tensor::zeros(&[out_features]).with_requires_grad(true));

        Self {
            weight,
            bias,
            in_features,
            out_features,
            hooks: ForwardHooks::new(),
        }
    }

    /// Creates a Linear layer from existing weight and bias tensors.
    pub fn from_weights(weight: Tensor, bias: Option<Tensor>) -> Result<Self> {
        if weight.ndim() != 2 {
            return Err(Error::invalid_operation(format!(
                "Linear weight must be 2-D, got shape {:?}",
                weight.shape()
            )));
        }
        let out_features = weight.shape()[0];
        let in_features = weight.shape()[1];

        if let Some(b) = &bias {
            if b.shape() != &[out_features] {
                return Err(Error::shape_mismatch(&[out_features], b.shape()));
            }
            weight.ensure_same_device(b)?;
        }

        Ok(Self {
            weight,
            bias,
            in_features,
            out_features,
            hooks: ForwardHooks::new(),
        })
    }

    /// Returns the input feature dimension.
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Returns the output feature dimension.
    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        self.weight.ensure_same_device(input)?;

        let shape = input.shape();
        if shape.last() != Some(&self.in_features) {
            return Err(Error::shape_mismatch(&[self.in_features], shape));
        }
        let rows = input.numel() / self.in_features.max(1);

        let x = input.as_slice();
        let w = self.weight.as_slice();
        let b = self.bias.as_ref().map(Tensor::as_slice);

        let mut out = vec![0.0f32; rows * self.out_features];
        for r in 0..rows {
            let xr = &x[r * self.in_features..(r + 1) * self.in_features];
            for o in 0..self.out_features {
                let wo = &w[o * self.in_features..(o + 1) * self.in_features];
                let dot: f32 = xr.iter().zip(wo).map(|(a, b)| a * b).sum();
                out[r * self.out_features + o] = dot + b.map_or(0.0, |b| b[o]);
            }
        }

        let mut out_shape = shape[..shape.len() - 1].to_vec();
        out_shape.push(self.out_features);

        let mut parents = vec![input, &self.weight];
        parents.extend(self.bias.as_ref());
        Tensor::from_op(out, &out_shape, input.device(), &parents)
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }

    fn to_device(&mut self, device: Device) -> Result<()> {
        self.weight = self.weight.to_device(device);
        self.bias = self.bias.as_ref().map(|b| b.to_device(device));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Linear"
    }
}

// =============================================================================
// Tests
// =============================================================================
