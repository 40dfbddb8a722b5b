//! End-to-end tests for activation analysis.
//!
//! These tests run complete analyses against small hand-built models and
//! check the recorded statistics as well as hook cleanup on every exit path.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axoncal_core::{is_grad_enabled, Device, Error, Result, Tensor};
use axoncal_data::{Dataset, VecDataset};
use axoncal_nn::{
    attached_hook_count, BatchNorm1d, Dropout, ForwardHooks, Linear, Module, ReLU, Sequential,
};
use axoncal_skew::{analyze_skew, ActivationStats, AnalyzeConfig, SkewAnalyzer, SkewError};

// =============================================================================
// Test Helpers
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

/// Emits a fixed tensor regardless of its input.
struct Fixed {
    output: Tensor,
    hooks: ForwardHooks,
}

impl Fixed {
    fn new(values: &[f32]) -> Self {
        Self {
            output: Tensor::from_slice(values, &[values.len()]).unwrap(),
            hooks: ForwardHooks::new(),
        }
    }
}

impl Module for Fixed {
    fn forward(&self, _input: &Tensor) -> Result<Tensor> {
        Ok(self.output.clone())
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }
}

/// conv1 -> conv2 -> fc, each emitting a known activation.
struct Net {
    conv1: Fixed,
    conv2: Fixed,
    fc: Fixed,
    calls: Arc<AtomicUsize>,
    hooks: ForwardHooks,
}

impl Net {
    fn new() -> Self {
        Self {
            conv1: Fixed::new(&[1.0, 2.0, 3.0, 4.0]),
            conv2: Fixed::new(&[0.0, 0.0, 0.0, 4.0]),
            fc: Fixed::new(&[-1.0, 1.0]),
            calls: Arc::new(AtomicUsize::new(0)),
            hooks: ForwardHooks::new(),
        }
    }
}

impl Module for Net {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let x = self.conv1.call(input)?;
        let x = self.conv2.call(&x)?;
        self.fc.call(&x)
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        vec![
            ("conv1".to_string(), &self.conv1 as &dyn Module),
            ("conv2".to_string(), &self.conv2 as &dyn Module),
            ("fc".to_string(), &self.fc as &dyn Module),
        ]
    }
}

/// Fails or panics in its forward pass.
struct Broken {
    panic: bool,
    hooks: ForwardHooks,
}

impl Module for Broken {
    fn forward(&self, _input: &Tensor) -> Result<Tensor> {
        if self.panic {
            panic!("forward pass exploded");
        }
        Err(Error::invalid_operation("unsupported input"))
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }
}

/// Runs the same child twice.
struct Twice {
    inner: Linear,
    hooks: ForwardHooks,
}

impl Module for Twice {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let x = self.inner.call(input)?;
        self.inner.call(&x)
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        vec![("shared".to_string(), &self.inner as &dyn Module)]
    }
}

fn calib() -> VecDataset {
    VecDataset::from_inputs(vec![Tensor::ones(&[1, 4])])
}

fn broken_model(panic: bool) -> Sequential {
    Sequential::new()
        .add_named("conv1", Fixed::new(&[1.0, 2.0]))
        .add_named(
            "conv2",
            Broken {
                panic,
                hooks: ForwardHooks::new(),
            },
        )
}

// =============================================================================
// Test 1: Recorded Statistics
// =============================================================================

#[test]
fn test_records_matching_layers_only() {
    init_tracing();
    let mut model = Net::new();

    let stats = analyze_skew(&mut model, &calib(), &["conv"], Device::Cpu).unwrap();
    assert_eq!(stats.layers(), vec!["conv1", "conv2"]);
    assert!(!stats.contains("fc"));

    let conv1 = stats.get("conv1").unwrap();
    assert_close(conv1.mean, 2.5);
    assert_close(conv1.std, 1.25_f64.sqrt());
    assert_close(conv1.min, 1.0);
    assert_close(conv1.max, 4.0);
    assert_close(conv1.skew, 0.0);

    let conv2 = stats.get("conv2").unwrap();
    assert_close(conv2.mean, 1.0);
    assert_close(conv2.std, 3.0_f64.sqrt());
    assert_close(conv2.min, 0.0);
    assert_close(conv2.max, 4.0);
    assert_close(conv2.skew, 6.0 / 3.0_f64.powf(1.5));

    assert_eq!(attached_hook_count(&model), 0);
}

#[test]
fn test_root_selected_by_empty_target() {
    let mut model = Net::new();
    let stats = analyze_skew(&mut model, &calib(), &[""], Device::Cpu).unwrap();

    // the root emits fc's output
    assert_eq!(stats.layers(), vec!["", "conv1", "conv2", "fc"]);
    assert_close(stats.get("").unwrap().mean, 0.0);
}

#[test]
fn test_shared_layer_keeps_last_output() {
    let weight = Tensor::from_vec(vec![2.0, 0.0, 0.0, 2.0], &[2, 2]).unwrap();
    let mut model = Twice {
        inner: Linear::from_weights(weight, None).unwrap(),
        hooks: ForwardHooks::new(),
    };
    let source = VecDataset::from_inputs(vec![Tensor::from_vec(vec![1.0, 3.0], &[1, 2]).unwrap()]);

    let stats = analyze_skew(&mut model, &source, &["shared"], Device::Cpu).unwrap();
    let shared = stats.get("shared").unwrap();
    assert_close(shared.min, 4.0);
    assert_close(shared.max, 12.0);
}

#[test]
fn test_only_first_batch_is_used() {
    let mut model = Sequential::new().add_named("act", ReLU::new());
    let source = VecDataset::from_inputs(vec![
        Tensor::full(&[2, 2], 3.0),
        Tensor::full(&[2, 2], 100.0),
    ]);

    let stats = analyze_skew(&mut model, &source, &["act"], Device::Cpu).unwrap();
    assert_close(stats.get("act").unwrap().max, 3.0);
}

// =============================================================================
// Test 2: Independence and Cleanup
// =============================================================================

#[test]
fn test_repeated_analyses_are_independent() {
    let mut model = Net::new();

    let first = analyze_skew(&mut model, &calib(), &["conv1"], Device::Cpu).unwrap();
    assert_eq!(attached_hook_count(&model), 0);

    let second = analyze_skew(&mut model, &calib(), &["fc"], Device::Cpu).unwrap();
    assert_eq!(attached_hook_count(&model), 0);

    assert_eq!(first.layers(), vec!["conv1"]);
    assert_eq!(second.layers(), vec!["fc"]);
    assert_eq!(model.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_plain_forward_unchanged_after_analyses() {
    let mut model = Sequential::new()
        .add_named("fc1", Linear::new(4, 8))
        .add_named("bn", BatchNorm1d::new(8))
        .add_named("act", ReLU::new())
        .add_named("fc2", Linear::new(8, 3));
    model.eval();
    let input = Tensor::uniform(&[5, 4], -1.0, 1.0);
    let source = VecDataset::from_inputs(vec![input.clone()]);

    let before = model.call(&input).unwrap();

    let first = analyze_skew(&mut model, &source, &["fc", "act"], Device::Cpu).unwrap();
    let second = analyze_skew(&mut model, &source, &[""], Device::Cpu).unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 5);
    assert_eq!(attached_hook_count(&model), 0);

    let after = model.call(&input).unwrap();
    assert_eq!(after.shape(), before.shape());
    assert_eq!(after.as_slice(), before.as_slice());

    // the earlier result set is not touched by later runs
    assert_eq!(first.layers(), vec!["act", "fc1", "fc2"]);
    assert_eq!(first.get("fc2"), second.get("fc2"));
}

#[test]
fn test_no_targets_still_runs_forward() {
    let mut model = Net::new();
    let targets: [&str; 0] = [];

    let stats = analyze_skew(&mut model, &calib(), &targets, Device::Cpu).unwrap();
    assert!(stats.is_empty());
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unmatched_targets_yield_empty_result() {
    let mut model = Net::new();
    let stats = analyze_skew(&mut model, &calib(), &["attention"], Device::Cpu).unwrap();
    assert!(stats.is_empty());
    assert_eq!(attached_hook_count(&model), 0);
}

#[test]
fn test_empty_calibration_source() {
    let mut model = Net::new();
    let empty = VecDataset::default();
    assert!(empty.is_empty());

    let err = analyze_skew(&mut model, &empty, &["conv"], Device::Cpu).unwrap_err();
    assert!(matches!(err, SkewError::EmptyCalibrationSource));
    assert_eq!(attached_hook_count(&model), 0);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_forward_error_is_propagated() {
    let mut model = broken_model(false);

    let err = analyze_skew(&mut model, &calib(), &["conv"], Device::Cpu).unwrap_err();
    match err {
        SkewError::Execution(inner) => {
            assert_eq!(inner, Error::invalid_operation("unsupported input"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(attached_hook_count(&model), 0);
    assert!(is_grad_enabled());
}

#[test]
fn test_panicking_forward_detaches_hooks() {
    let mut model = broken_model(true);

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        analyze_skew(&mut model, &calib(), &["conv"], Device::Cpu)
    }));
    assert!(outcome.is_err());
    assert_eq!(attached_hook_count(&model), 0);
    assert!(is_grad_enabled());
}

// =============================================================================
// Test 3: Device Placement and Configuration
// =============================================================================

#[test]
fn test_analysis_on_accelerator_device() {
    init_tracing();
    let mut model = Sequential::new()
        .add_named("fc1", Linear::new(4, 8))
        .add_named("bn", BatchNorm1d::new(8))
        .add_named("drop", Dropout::new(0.5))
        .add_named("fc2", Linear::new(8, 2));
    let source = VecDataset::from_inputs(vec![Tensor::uniform(&[16, 4], -1.0, 1.0)]);

    let stats = analyze_skew(&mut model, &source, &["fc", "bn"], Device::Cuda(0)).unwrap();
    assert_eq!(stats.layers(), vec!["bn", "fc1", "fc2"]);
    assert!(!model.is_training());

    for (_, record) in stats.iter() {
        assert!(record.min <= record.mean && record.mean <= record.max);
        assert!(record.std >= 0.0);
    }
}

#[test]
fn test_analyzer_from_toml_config() {
    let config = AnalyzeConfig::from_toml_str(
        r#"
        targets = ["conv2"]
        device = "cuda:0"

        [stats]
        convention = "sample"
        "#,
    )
    .unwrap();
    let analyzer = SkewAnalyzer::from_config(&config).unwrap();
    assert_eq!(analyzer.device(), Device::Cuda(0));

    let mut model = Net::new();
    let stats = analyzer.analyze(&mut model, &calib()).unwrap();

    // sample convention: sum of squared deviations 12 over n - 1 = 3
    assert_close(stats.get("conv2").unwrap().std, 2.0);
}

#[test]
fn test_stats_export_round_trip() {
    let mut model = Net::new();
    let stats = analyze_skew(&mut model, &calib(), &["conv"], Device::Cpu).unwrap();

    let json = stats.to_json().unwrap();
    let parsed: ActivationStats = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, stats);

    let table = stats.to_string();
    assert!(table.contains("conv1"));
    assert!(table.contains("conv2"));
}
