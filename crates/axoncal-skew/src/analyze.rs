//! Activation Analysis - One Instrumented Calibration Pass
//!
//! [`SkewAnalyzer::analyze`] moves the model to the target device, attaches
//! a statistics hook to every selected layer, runs exactly one forward pass
//! on the first calibration batch in evaluation mode without gradient
//! tracking, and returns the collected statistics.
//!
//! Hooks are owned by an [`ObservationScope`]. Dropping the scope detaches
//! all of them, so they are gone on every exit path: normal return, an
//! error from the forward pass, an empty calibration source, or a panic
//! unwinding through the analysis.
//!
//! # Example
//! ```
//! use axoncal_core::{Device, Tensor};
//! use axoncal_data::VecDataset;
//! use axoncal_nn::prelude::*;
//! use axoncal_skew::analyze_skew;
//!
//! let mut model = Sequential::new()
//!     .add_named("conv1", Conv1d::new(1, 2, 3))
//!     .add_named("act", ReLU::new());
//! let calib = VecDataset::from_inputs(vec![Tensor::ones(&[4, 1, 8])]);
//!
//! let stats = analyze_skew(&mut model, &calib, &["conv"], Device::Cpu).unwrap();
//! assert_eq!(stats.layers(), vec!["conv1"]);
//! assert_eq!(attached_hook_count(&model), 0);
//! ```
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use axoncal_core::{no_grad, Device};
use axoncal_data::{Dataset, Sample};
use axoncal_nn::{named_modules, HookHandle, Module};
use tracing::{debug, info, trace, warn};

use crate::config::AnalyzeConfig;
use crate::error::{SkewError, SkewResult};
use crate::matcher::LayerMatcher;
use crate::observer::{make_skew_hook, ResultsStore};
use crate::report::ActivationStats;
use crate::stats::StatConfig;

// =============================================================================
// ObservationScope
// =============================================================================

/// Owns the hooks attached for one analysis and detaches them on drop.
#[must_use = "dropping the scope detaches every observation hook"]
#[derive(Debug)]
pub struct ObservationScope {
    handles: Vec<(String, HookHandle)>,
}

impl ObservationScope {
    /// Attaches a statistics hook to each `(name, module)` pair.
    pub fn attach<'a>(
        layers: impl IntoIterator<Item = (String, &'a dyn Module)>,
        store: &ResultsStore,
        config: StatConfig,
    ) -> Self {
        let mut handles = Vec::new();
        for (name, module) in layers {
            debug!(layer = %name, kind = module.name(), "attaching observation hook");
            let hook = make_skew_hook(name.clone(), store.clone(), config);
            handles.push((name, module.register_forward_hook(hook)));
        }
        Self { handles }
    }

    /// Returns the number of attached hooks.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns true if nothing was attached.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns the observed layer names in attachment order.
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(|(name, _)| name.as_str())
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        for (layer, handle) in self.handles.drain(..) {
            let removed = handle.remove();
            trace!(layer = %layer, removed, "detached observation hook");
        }
    }
}

// =============================================================================
// SkewAnalyzer
// =============================================================================

/// Runs activation analyses with a fixed target set, device and statistics
/// configuration.
#[derive(Debug, Clone)]
pub struct SkewAnalyzer {
    matcher: LayerMatcher,
    device: Device,
    stats: StatConfig,
}

impl SkewAnalyzer {
    /// Creates an analyzer with default statistics settings.
    pub fn new(matcher: LayerMatcher, device: Device) -> Self {
        Self {
            matcher,
            device,
            stats: StatConfig::default(),
        }
    }

    /// Creates an analyzer from a validated configuration.
    pub fn from_config(config: &AnalyzeConfig) -> SkewResult<Self> {
        config.validate()?;
        Ok(Self {
            matcher: LayerMatcher::new(config.targets.iter().cloned()),
            device: config.device()?,
            stats: config.stats,
        })
    }

    /// Sets the statistics parameters.
    pub fn with_stats(mut self, stats: StatConfig) -> Self {
        self.stats = stats;
        self
    }

    /// Returns the target device.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns the layer matcher.
    pub fn matcher(&self) -> &LayerMatcher {
        &self.matcher
    }

    /// Instruments `model`, evaluates the first batch of `calib` once and
    /// returns the statistics of every selected layer that executed.
    ///
    /// The model is left on the target device and in evaluation mode, with
    /// no hooks attached. Forward failures are returned as
    /// [`SkewError::Execution`] carrying the original error.
    pub fn analyze<M, D>(&self, model: &mut M, calib: &D) -> SkewResult<ActivationStats>
    where
        M: Module,
        D: Dataset<Item = Sample> + ?Sized,
    {
        info!(
            device = %self.device,
            targets = ?self.matcher.targets(),
            "starting activation analysis"
        );

        model.to_device(self.device)?;

        let store = ResultsStore::new();
        let scope = {
            let selected = self.matcher.select(named_modules(&*model));
            if selected.is_empty() {
                warn!(targets = ?self.matcher.targets(), "no layer matches the targets");
            }
            ObservationScope::attach(selected, &store, self.stats)
        };

        model.eval();

        let outcome = no_grad(|| -> SkewResult<()> {
            let (input, _label) = calib.get(0).ok_or(SkewError::EmptyCalibrationSource)?;
            let input = input.to_device(self.device);
            model.call(&input)?;
            Ok(())
        });

        let observed = scope.len();
        drop(scope);
        outcome?;

        let stats = store.into_stats();
        info!(
            observed,
            recorded = stats.len(),
            "activation analysis finished"
        );
        Ok(stats)
    }
}

// =============================================================================
// Convenience Function
// =============================================================================

/// Collects activation statistics of every layer whose name contains one of
/// `targets`, using the first batch of `calib` on `device`.
///
/// Shorthand for [`SkewAnalyzer::analyze`] with default statistics settings.
pub fn analyze_skew<M, D, S>(
    model: &mut M,
    calib: &D,
    targets: &[S],
    device: Device,
) -> SkewResult<ActivationStats>
where
    M: Module,
    D: Dataset<Item = Sample> + ?Sized,
    S: AsRef<str>,
{
    let matcher = LayerMatcher::new(targets.iter().map(|t| t.as_ref().to_string()));
    SkewAnalyzer::new(matcher, device).analyze(model, calib)
}

// =============================================================================
// Tests
// =============================================================================
