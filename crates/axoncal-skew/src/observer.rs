//! Observation Points - Hooks Recording Activation Statistics
//!
//! [`make_skew_hook`] builds a forward hook bound to one layer name and an
//! explicit [`ResultsStore`] handle. Each invocation snapshots the layer's
//! output (detached, on host memory, flattened), summarizes it and writes
//! the record under the layer's name, replacing any earlier record for the
//! same layer.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::HashMap;
use std::sync::Arc;

use axoncal_core::Tensor;
use axoncal_nn::ForwardHook;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::report::ActivationStats;
use crate::stats::{StatConfig, StatRecord};

// =============================================================================
// ResultsStore
// =============================================================================

/// Shared map from layer name to its latest [`StatRecord`].
///
/// Cloning yields another handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct ResultsStore {
    inner: Arc<Mutex<HashMap<String, StatRecord>>>,
}

impl ResultsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` for `layer`, returning the record it replaced.
    pub fn record(&self, layer: &str, record: StatRecord) -> Option<StatRecord> {
        self.inner.lock().insert(layer.to_string(), record)
    }

    /// Returns the record for `layer`, if any.
    pub fn get(&self, layer: &str) -> Option<StatRecord> {
        self.inner.lock().get(layer).copied()
    }

    /// Returns the number of layers recorded.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Takes every record out of the store.
    ///
    /// Handles still held elsewhere see an empty store afterwards.
    pub fn into_stats(self) -> ActivationStats {
        let records = std::mem::take(&mut *self.inner.lock());
        ActivationStats::from_records(records)
    }
}

// =============================================================================
// Hook Factory
// =============================================================================

/// Returns the read-only snapshot a hook summarizes: detached from gradient
/// tracking, relocated to host memory and flattened.
pub fn activation_sample(output: &Tensor) -> Tensor {
    output.detach().cpu().flatten()
}

/// Builds a forward hook that records statistics of the output under `layer`.
///
/// The hook never modifies the value flowing through the model. An empty
/// output is logged and leaves the store untouched.
pub fn make_skew_hook(
    layer: impl Into<String>,
    store: ResultsStore,
    config: StatConfig,
) -> ForwardHook {
    let layer = layer.into();
    Arc::new(move |_input: &Tensor, output: &Tensor| {
        let sample = activation_sample(output);
        match StatRecord::with_config(sample.as_slice(), &config) {
            Some(record) => {
                debug!(
                    layer = %layer,
                    numel = sample.numel(),
                    mean = record.mean,
                    skew = record.skew,
                    "recorded activation statistics"
                );
                if store.record(&layer, record).is_some() {
                    debug!(layer = %layer, "layer ran again; keeping the latest statistics");
                }
            }
            None => warn!(layer = %layer, "layer produced an empty output; nothing recorded"),
        }
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axoncal_core::{no_grad, Device};

    #[test]
    fn test_activation_sample() {
        let out = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2])
            .unwrap()
            .to_device(Device::Cuda(0))
            .with_requires_grad(true);
        let sample = activation_sample(&out);

        assert_eq!(sample.shape(), &[4]);
        assert_eq!(sample.device(), Device::Cpu);
        assert!(!sample.requires_grad());
        // original untouched
        assert_eq!(out.shape(), &[2, 2]);
        assert_eq!(out.device(), Device::Cuda(0));
        assert!(out.requires_grad());
    }

    #[test]
    fn test_hook_writes_store() {
        let store = ResultsStore::new();
        let hook = make_skew_hook("conv1", store.clone(), StatConfig::default());

        let input = Tensor::ones(&[1]);
        let output = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[1, 3]).unwrap();
        hook(&input, &output);

        let record = store.get("conv1").unwrap();
        assert!((record.mean - 2.0).abs() < 1e-12);
        assert_eq!(record.min, 1.0);
        assert_eq!(record.max, 3.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_hook_last_write_wins() {
        let store = ResultsStore::new();
        let hook = make_skew_hook("shared", store.clone(), StatConfig::default());

        let input = Tensor::ones(&[1]);
        hook(&input, &Tensor::full(&[4], 1.0));
        hook(&input, &Tensor::full(&[4], 9.0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("shared").unwrap().mean, 9.0);
    }

    #[test]
    fn test_hook_skips_empty_output() {
        let store = ResultsStore::new();
        let hook = make_skew_hook("empty", store.clone(), StatConfig::default());
        hook(&Tensor::ones(&[1]), &Tensor::zeros(&[0]));
        assert!(store.is_empty());
    }

    #[test]
    fn test_hook_under_no_grad() {
        let store = ResultsStore::new();
        let hook = make_skew_hook("fc", store.clone(), StatConfig::default());
        let output = Tensor::full(&[3], 2.0).with_requires_grad(true);
        no_grad(|| hook(&output, &output));
        assert_eq!(store.get("fc").unwrap().std, 0.0);
    }

    #[test]
    fn test_into_stats_drains_shared_handles() {
        let store = ResultsStore::new();
        let other = store.clone();
        store.record("a", StatRecord::from_sample(&[1.0]).unwrap());

        let stats = store.into_stats();
        assert_eq!(stats.len(), 1);
        assert!(other.is_empty());
    }
}
