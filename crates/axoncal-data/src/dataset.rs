//! Dataset Trait - Core Data Abstraction
//!
//! Defines the Dataset trait that calibration sources implement.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use axoncal_core::{Error, Result, Tensor};

/// An `(input, label)` pair.
pub type Sample = (Tensor, Tensor);

// =============================================================================
// Dataset Trait
// =============================================================================

/// Core trait for all datasets.
///
/// A dataset provides indexed access to data items.
pub trait Dataset: Send + Sync {
    /// The type of items in the dataset.
    type Item: Send;

    /// Returns the number of items in the dataset.
    fn len(&self) -> usize;

    /// Returns true if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets an item by index.
    fn get(&self, index: usize) -> Option<Self::Item>;
}

impl<D: Dataset + ?Sized> Dataset for &D {
    type Item = D::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        (**self).get(index)
    }
}

// =============================================================================
// VecDataset
// =============================================================================

/// A dataset over pre-built `(input, label)` pairs.
///
/// Each entry is typically a whole calibration batch.
#[derive(Debug, Clone, Default)]
pub struct VecDataset {
    items: Vec<Sample>,
}

impl VecDataset {
    /// Creates a dataset from `(input, label)` pairs.
    pub fn new(items: Vec<Sample>) -> Self {
        Self { items }
    }

    /// Creates a dataset whose labels are empty tensors.
    pub fn from_inputs(inputs: Vec<Tensor>) -> Self {
        Self {
            items: inputs
                .into_iter()
                .map(|x| (x, Tensor::zeros(&[0])))
                .collect(),
        }
    }

    /// Appends a pair.
    pub fn push(&mut self, input: Tensor, label: Tensor) {
        self.items.push((input, label));
    }
}

impl Dataset for VecDataset {
    type Item = Sample;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.items.get(index).cloned()
    }
}

// =============================================================================
// TensorDataset
// =============================================================================

/// A dataset wrapping input and target tensors split along dimension 0.
///
/// Each item is a tuple of (input, target) rows.
#[derive(Debug, Clone)]
pub struct TensorDataset {
    data: Tensor,
    targets: Tensor,
    len: usize,
}

impl TensorDataset {
    /// Creates a new `TensorDataset` from input and target tensors.
    ///
    /// The first dimension of both tensors must match.
    pub fn new(data: Tensor, targets: Tensor) -> Result<Self> {
        let len = data.shape().first().copied().unwrap_or(0);
        let target_len = targets.shape().first().copied().unwrap_or(0);
        if len != target_len || data.ndim() == 0 {
            return Err(Error::shape_mismatch(&[len], &[target_len]));
        }
        Ok(Self { data, targets, len })
    }

    fn row(tensor: &Tensor, index: usize) -> Option<Tensor> {
        let shape = tensor.shape();
        let row_shape: Vec<usize> = if shape.len() > 1 {
            shape[1..].to_vec()
        } else {
            vec![1]
        };
        let row_size: usize = row_shape.iter().product();
        let start = index * row_size;
        let values = tensor.as_slice().get(start..start + row_size)?;
        Tensor::from_slice(values, &row_shape)
            .ok()
            .map(|t| t.to_device(tensor.device()))
    }
}

impl Dataset for TensorDataset {
    type Item = Sample;

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        if index >= self.len {
            return None;
        }
        Some((
            Self::row(&self.data, index)?,
            Self::row(&self.targets, index)?,
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
