//! Normalization Layers - BatchNorm1d
//!
//! Batch normalization behaves differently in the two modes: training
//! normalizes with batch statistics and updates the running estimates,
//! evaluation normalizes with the running estimates and leaves them alone.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use axoncal_core::{Device, Error, Result, Tensor};
use parking_lot::RwLock;

use crate::hooks::ForwardHooks;
use crate::module::Module;

// =============================================================================
// BatchNorm1d
// =============================================================================

/// Applies Batch Normalization over a 2D or 3D input.
///
/// y = (x - E[x]) / sqrt(Var[x] + eps) * gamma + beta
///
/// # Shape
/// - Input: (N, C) or (N, C, L)
/// - Output: Same as input
pub struct BatchNorm1d {
    /// Learnable scale parameter (gamma).
    pub weight: Tensor,
    /// Learnable shift parameter (beta).
    pub bias: Tensor,
    running_mean: RwLock<Tensor>,
    running_var: RwLock<Tensor>,
    num_features: usize,
    eps: f32,
    /// running = (1 - momentum) * running + momentum * batch
    momentum: f32,
    training: bool,
    hooks: ForwardHooks,
}

impl BatchNorm1d {
    /// Creates a new BatchNorm1d layer.
    pub fn new(num_features: usize) -> Self {
        Self::with_options(num_features, 1e-5, 0.1)
    }

    /// Creates a BatchNorm1d with custom options.
    pub fn with_options(num_features: usize, eps: f32, momentum: f32) -> Self {
        Self {
            weight: Tensor::ones(&[num_features]).with_requires_grad(true),
            bias: Tensor::zeros(&[num_features]).with_requires_grad(true),
            running_mean: RwLock::new(Tensor::zeros(&[num_features])),
            running_var: RwLock::new(Tensor::ones(&[num_features])),
            num_features,
            eps,
            momentum,
            training: true,
            hooks: ForwardHooks::new(),
        }
    }

    /// Returns the number of features.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Returns a snapshot of the running mean.
    pub fn running_mean(&self) -> Tensor {
        self.running_mean.read().clone()
    }

    /// Returns a snapshot of the running variance.
    pub fn running_var(&self) -> Tensor {
        self.running_var.read().clone()
    }

    fn batch_statistics(&self, x: &[f32], batch: usize, spatial: usize) -> (Vec<f32>, Vec<f32>) {
        let c_total = self.num_features;
        let count = (batch * spatial) as f32;
        let mut means = vec![0.0f32; c_total];
        let mut vars = vec![0.0f32; c_total];

        for c in 0..c_total {
            let values = (0..batch).flat_map(|b| {
                let start = b * c_total * spatial + c * spatial;
                x[start..start + spatial].iter().copied()
            });
            let sum: f32 = values.clone().sum();
            means[c] = sum / count;
            vars[c] = values.map(|v| (v - means[c]).powi(2)).sum::<f32>() / count;
        }

        (means, vars)
    }

    fn update_running(&self, means: &[f32], vars: &[f32], count: usize) -> Result<()> {
        // Running variance uses the unbiased estimate
        let correction = if count > 1 {
            count as f32 / (count - 1) as f32
        } else {
            1.0
        };

        let mut running_mean = self.running_mean.write();
        let mut running_var = self.running_var.write();
        let device = running_mean.device();

        let new_mean: Vec<f32> = running_mean
            .as_slice()
            .iter()
            .zip(means)
            .map(|(&rm, &m)| (1.0 - self.momentum) * rm + self.momentum * m)
            .collect();
        let new_var: Vec<f32> = running_var
            .as_slice()
            .iter()
            .zip(vars)
            .map(|(&rv, &v)| (1.0 - self.momentum) * rv + self.momentum * v * correction)
            .collect();

        *running_mean = Tensor::from_vec(new_mean, &[self.num_features])?.to_device(device);
        *running_var = Tensor::from_vec(new_var, &[self.num_features])?.to_device(device);
        Ok(())
    }
}

impl Module for BatchNorm1d {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        self.weight.ensure_same_device(input)?;

        let shape = input.shape();
        if shape.len() < 2 || shape.len() > 3 || shape[1] != self.num_features {
            return Err(Error::shape_mismatch(&[0, self.num_features], shape));
        }
        let batch = shape[0];
        let spatial = if shape.len() == 3 { shape[2] } else { 1 };
        let x = input.as_slice();

        let (means, vars) = if self.training {
            if batch * spatial < 2 {
                return Err(Error::invalid_operation(
                    "BatchNorm1d needs more than one value per channel in training mode",
                ));
            }
            let (means, vars) = self.batch_statistics(x, batch, spatial);
            self.update_running(&means, &vars, batch * spatial)?;
            (means, vars)
        } else {
            (
                self.running_mean.read().to_vec(),
                self.running_var.read().to_vec(),
            )
        };

        let gamma = self.weight.as_slice();
        let beta = self.bias.as_slice();
        let c_total = self.num_features;
        let out: Vec<f32> = x
            .iter()
            .enumerate()
            .map(|(idx, &v)| {
                let c = (idx / spatial) % c_total;
                (v - means[c]) / (vars[c] + self.eps).sqrt() * gamma[c] + beta[c]
            })
            .collect();

        Tensor::from_op(out, shape, input.device(), &[input, &self.weight, &self.bias])
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }

    fn to_device(&mut self, device: Device) -> Result<()> {
        self.weight = self.weight.to_device(device);
        self.bias = self.bias.to_device(device);
        let mean = self.running_mean.get_mut();
        *mean = mean.to_device(device);
        let var = self.running_var.get_mut();
        *var = var.to_device(device);
        Ok(())
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }

    fn name(&self) -> &'static str {
        "BatchNorm1d"
    }
}

// =============================================================================
// Tests
// =============================================================================
