//! Convolutional Layers - 1D Convolution
//!
//! Applies a 1D convolution over an input signal.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use axoncal_core::{Device, Error, Result, Tensor};

use crate::hooks::ForwardHooks;
use crate::module::Module;

// =============================================================================
// Conv1d
// =============================================================================

/// Applies a 1D convolution over an input signal.
///
/// # Shape
/// - Input: (N, C_in, L)
/// - Output: (N, C_out, L_out)
///
/// where L_out = (L + 2*padding - kernel_size) / stride + 1
pub struct Conv1d {
    /// Weight tensor of shape (out_channels, in_channels, kernel_size).
    pub weight: Tensor,
    /// Bias tensor of shape (out_channels).
    pub bias: Option<Tensor>,
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    stride: usize,
    padding: usize,
    hooks: ForwardHooks,
}

impl Conv1d {
    /// Creates a new Conv1d layer with stride 1, no padding and a bias.
    pub fn new(in_channels: usize, out_channels: usize, kernel_size: usize) -> Self {
        Self::with_options(in_channels, out_channels, kernel_size, 1, 0, true)
    }

    /// Creates a Conv1d layer with all options.
    pub fn with_options(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        padding: usize,
        bias: bool,
    ) -> Self {
        let fan_in = (in_channels * kernel_size).max(1);
        let bound = 1.0 / (fan_in as f32).sqrt();
        let weight = Tensor::uniform(&[out_channels, in_channels, kernel_size], -bound, bound)
            .with_requires_grad(true);
        let bias = bias.then(|| Tensor::zeros(&[out_channels]).with_requires_grad(true));

        Self {
            weight,
            bias,
            in_channels,
            out_channels,
            kernel_size,
            stride: stride.max(1),
            padding,
            hooks: ForwardHooks::new(),
        }
    }

    /// Creates a Conv1d layer from existing weights.
    pub fn from_weights(
        weight: Tensor,
        bias: Option<Tensor>,
        stride: usize,
        padding: usize,
    ) -> Result<Self> {
        if weight.ndim() != 3 {
            return Err(Error::invalid_operation(format!(
                "Conv1d weight must be 3-D, got shape {:?}",
                weight.shape()
            )));
        }
        let (out_channels, in_channels, kernel_size) =
            (weight.shape()[0], weight.shape()[1], weight.shape()[2]);

        if let Some(b) = &bias {
            if b.shape() != &[out_channels] {
                return Err(Error::shape_mismatch(&[out_channels], b.shape()));
            }
        }

        Ok(Self {
            weight,
            bias,
            in_channels,
            out_channels,
            kernel_size,
            stride: stride.max(1),
            padding,
            hooks: ForwardHooks::new(),
        })
    }

    /// Returns the output length for an input of length `len`.
    pub fn output_len(&self, len: usize) -> Option<usize> {
        let padded = len + 2 * self.padding;
        (padded >= self.kernel_size).then(|| (padded - self.kernel_size) / self.stride + 1)
    }
}

impl Module for Conv1d {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        self.weight.ensure_same_device(input)?;

        let shape = input.shape();
        if shape.len() != 3 || shape[1] != self.in_channels {
            return Err(Error::shape_mismatch(&[0, self.in_channels, 0], shape));
        }
        let (batch, len) = (shape[0], shape[2]);
        let out_len = self.output_len(len).ok_or_else(|| {
            Error::invalid_operation(format!(
                "Conv1d kernel {} larger than padded input {}",
                self.kernel_size,
                len + 2 * self.padding
            ))
        })?;

        let x = input.as_slice();
        let w = self.weight.as_slice();
        let b = self.bias.as_ref().map(Tensor::as_slice);

        let mut out = vec![0.0f32; batch * self.out_channels * out_len];
        for n in 0..batch {
            for oc in 0..self.out_channels {
                for ol in 0..out_len {
                    let mut acc = b.map_or(0.0, |b| b[oc]);
                    for ic in 0..self.in_channels {
                        for k in 0..self.kernel_size {
                            let pos = (ol * self.stride + k) as isize - self.padding as isize;
                            if pos < 0 || pos as usize >= len {
                                continue;
                            }
                            let xi = n * self.in_channels * len + ic * len + pos as usize;
                            let wi = oc * self.in_channels * self.kernel_size
                                + ic * self.kernel_size
                                + k;
                            acc += x[xi] * w[wi];
                        }
                    }
                    out[n * self.out_channels * out_len + oc * out_len + ol] = acc;
                }
            }
        }

        let mut parents = vec![input, &self.weight];
        parents.extend(self.bias.as_ref());
        Tensor::from_op(
            out,
            &[batch, self.out_channels, out_len],
            input.device(),
            &parents,
        )
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
        "Conv1d"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conv1d_shape() {
        let conv = Conv1d::new(2, 4, 3);
        let output = conv.forward(&Tensor::ones(&[3, 2, 10])).unwrap();
        assert_eq!(output.shape(), &[3, 4, 8]);
    }

    #[test]
    fn test_conv1d_known_kernel() {
        // Single channel difference kernel [-1, 1]
        let weight = Tensor::from_vec(vec![-1.0, 1.0], &[1, 1, 2]).unwrap();
        let conv = Conv1d::from_weights(weight, None, 1, 0).unwrap();

        let input = Tensor::from_vec(vec![1.0, 4.0, 9.0, 16.0], &[1, 1, 4]).unwrap();
        let output = conv.forward(&input).unwrap();
        assert_eq!(output.to_vec(), vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_conv1d_padding_and_stride() {
        let weight = Tensor::from_vec(vec![1.0, 1.0, 1.0], &[1, 1, 3]).unwrap();
        let bias = Tensor::from_vec(vec![0.5], &[1]).unwrap();
        let conv = Conv1d::from_weights(weight, Some(bias), 2, 1).unwrap();

        let input = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[1, 1, 4]).unwrap();
        let output = conv.forward(&input).unwrap();
        // windows: [0,1,2], [2,3,4] -> sums 3, 9
        assert_eq!(output.to_vec(), vec![3.5, 9.5]);
    }

    #[test]
    fn test_conv1d_rejects_bad_input() {
        let conv = Conv1d::new(2, 1, 5);
        assert!(conv.forward(&Tensor::ones(&[1, 3, 8])).is_err());
        assert!(conv.forward(&Tensor::ones(&[1, 2, 3])).is_err());
    }
}
