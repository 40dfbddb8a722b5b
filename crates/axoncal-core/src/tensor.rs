//! Tensor - Shaped, Device-Tagged `f32` Array
//!
//! The `Tensor` struct carries the activations that flow between modules.
//! Storage is reference-counted host memory, so cloning a tensor or moving
//! it between devices never mutates the original. Each tensor records the
//! device it was placed on and whether it takes part in gradient tracking.
//!
//! # Key Features
//! - Row-major storage with a small-vector shape
//! - Explicit relocation via `to_device` / `cpu`
//! - `detach` to drop gradient tracking
//! - `from_op` for layer implementations producing new tensors
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;
use std::sync::Arc;

use rand::Rng;
use smallvec::SmallVec;

use crate::device::Device;
use crate::error::{Error, Result};
use crate::grad::is_grad_enabled;

// =============================================================================
// Type Aliases
// =============================================================================

/// Shape type - dimensions of a tensor.
/// Uses `SmallVec` for stack allocation of small shapes (up to 6 dimensions).
pub type Shape = SmallVec<[usize; 6]>;

fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

// =============================================================================
// Tensor Struct
// =============================================================================

/// An N-dimensional array of `f32` values placed on a [`Device`].
#[derive(Clone)]
pub struct Tensor {
    /// Row-major element storage (reference-counted).
    data: Arc<[f32]>,
    /// Shape of the tensor (dimensions).
    shape: Shape,
    /// Device this tensor is placed on.
    device: Device,
    /// Whether this tensor takes part in gradient tracking.
    requires_grad: bool,
}

impl Tensor {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a new CPU tensor from a vector with the given shape.
    ///
    /// # Returns
    /// New tensor, or error if shape doesn't match data length.
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Result<Self> {
        if numel(shape) != data.len() {
            return Err(Error::shape_mismatch(&[data.len()], shape));
        }

        Ok(Self {
            data: data.into(),
            shape: Shape::from_slice(shape),
            device: Device::Cpu,
            requires_grad: false,
        })
    }

    /// Creates a new CPU tensor by copying a slice.
    pub fn from_slice(data: &[f32], shape: &[usize]) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Creates the result of an operation over `parents`.
    ///
    /// The result lives on `device` and tracks gradients only when at least
    /// one parent does and gradient mode is enabled.
    pub fn from_op(
        data: Vec<f32>,
        shape: &[usize],
        device: Device,
        parents: &[&Tensor],
    ) -> Result<Self> {
        let mut out = Self::from_vec(data, shape)?;
        out.device = device;
        out.requires_grad = is_grad_enabled() && parents.iter().any(|p| p.requires_grad);
        Ok(out)
    }

    /// Creates a CPU tensor filled with `value`.
    #[must_use]
    pub fn full(shape: &[usize], value: f32) -> Self {
        Self {
            data: vec![value; numel(shape)].into(),
            shape: Shape::from_slice(shape),
            device: Device::Cpu,
            requires_grad: false,
        }
    }

    /// Creates a CPU tensor filled with zeros.
    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, 0.0)
    }

    /// Creates a CPU tensor filled with ones.
    #[must_use]
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, 1.0)
    }

    /// Creates a CPU tensor with values drawn uniformly from `[low, high)`.
    #[must_use]
    pub fn uniform(shape: &[usize], low: f32, high: f32) -> Self {
        let mut rng = rand::thread_rng();
        let data: Vec<f32> = (0..numel(shape)).map(|_| rng.gen_range(low..high)).collect();
        Self {
            data: data.into(),
            shape: Shape::from_slice(shape),
            device: Device::Cpu,
            requires_grad: false,
        }
    }

    /// Returns this tensor with gradient tracking switched on or off.
    #[must_use]
    pub fn with_requires_grad(mut self, requires_grad: bool) -> Self {
        self.requires_grad = requires_grad;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the device this tensor is placed on.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns whether this tensor takes part in gradient tracking.
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Returns the elements in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the elements as an owned vector.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.to_vec()
    }

    // =========================================================================
    // Shape Operations
    // =========================================================================

    /// Returns a view with a new shape sharing the same storage.
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Self> {
        if numel(new_shape) != self.numel() {
            return Err(Error::shape_mismatch(&self.shape, new_shape));
        }

        Ok(Self {
            data: Arc::clone(&self.data),
            shape: Shape::from_slice(new_shape),
            device: self.device,
            requires_grad: self.requires_grad,
        })
    }

    /// Returns a one-dimensional view over all elements.
    pub fn flatten(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            shape: smallvec::smallvec![self.numel()],
            device: self.device,
            requires_grad: self.requires_grad,
        }
    }

    // =========================================================================
    // Gradient & Device Operations
    // =========================================================================

    /// Returns a tensor sharing storage but excluded from gradient tracking.
    pub fn detach(&self) -> Self {
        Self {
            requires_grad: false,
            ..self.clone()
        }
    }

    /// Relocates the tensor to `device`.
    ///
    /// The original tensor is left untouched; relocating to the device the
    /// tensor already lives on is a cheap clone.
    pub fn to_device(&self, device: Device) -> Self {
        if self.device == device {
            return self.clone();
        }

        Self {
            data: self.data.iter().copied().collect(),
            shape: self.shape.clone(),
            device,
            requires_grad: self.requires_grad,
        }
    }

    /// Relocates the tensor to host memory.
    pub fn cpu(&self) -> Self {
        self.to_device(Device::Cpu)
    }

    /// Fails unless `other` lives on the same device as `self`.
    pub fn ensure_same_device(&self, other: &Tensor) -> Result<()> {
        if self.device == other.device {
            Ok(())
        } else {
            Err(Error::device_mismatch(self.device, other.device))
        }
    }

    // =========================================================================
    // Elementwise Operations
    // =========================================================================

    /// Applies `f` to every element.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
            device: self.device,
            requires_grad: self.requires_grad && is_grad_enabled(),
        }
    }

    /// Elementwise addition of two tensors with identical shape and device.
    pub fn add(&self, other: &Tensor) -> Result<Self> {
        self.ensure_same_device(other)?;
        if self.shape != other.shape {
            return Err(Error::shape_mismatch(&self.shape, &other.shape));
        }

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a + b)
            .collect();
        Self::from_op(data, &self.shape, self.device, &[self, other])
    }

    /// Multiplies every element by `scalar`.
    pub fn mul_scalar(&self, scalar: f32) -> Self {
        self.map(|x| x * scalar)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape.as_slice())
            .field("device", &self.device)
            .field("requires_grad", &self.requires_grad)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
