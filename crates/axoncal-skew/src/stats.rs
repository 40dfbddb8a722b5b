//! Activation Statistics - Summary of One Observed Output
//!
//! Reduces a flattened activation sample to the five numbers used to pick
//! quantization parameters: mean, standard deviation, extrema and skewness.
//!
//! Skewness is the third central moment divided by `std^3 + epsilon`. The
//! epsilon is always added, so a constant sample (std = 0) yields a skew of
//! exactly 0 instead of a division by zero.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use serde::{Deserialize, Serialize};

/// Default epsilon added to the skewness denominator.
pub const SKEW_EPSILON: f64 = 1e-6;

// =============================================================================
// Configuration
// =============================================================================

/// Divisor used for the variance behind `std`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdConvention {
    /// Divide by N.
    #[default]
    Population,
    /// Divide by N - 1 (Bessel's correction). A single value yields std = 0.
    Sample,
}

/// Parameters of the statistics computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatConfig {
    /// Added to `std^3` in the skewness denominator.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Variance convention for `std`.
    #[serde(default)]
    pub convention: StdConvention,
}

fn default_epsilon() -> f64 {
    SKEW_EPSILON
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            convention: StdConvention::default(),
        }
    }
}

// =============================================================================
// StatRecord
// =============================================================================

/// Distribution summary of one activation sample.
///
/// Non-finite fields serialize as the strings `"NaN"`, `"inf"` and `"-inf"`
/// so exported records always read back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Arithmetic mean.
    #[serde(with = "non_finite")]
    pub mean: f64,
    /// Standard deviation.
    #[serde(with = "non_finite")]
    pub std: f64,
    /// Smallest value.
    #[serde(with = "non_finite")]
    pub min: f64,
    /// Largest value.
    #[serde(with = "non_finite")]
    pub max: f64,
    /// Epsilon-guarded skewness.
    #[serde(with = "non_finite")]
    pub skew: f64,
}

impl StatRecord {
    /// Computes statistics with the default configuration
    /// (population std, epsilon `1e-6`).
    ///
    /// Returns `None` for an empty sample.
    pub fn from_sample(sample: &[f32]) -> Option<Self> {
        Self::with_config(sample, &StatConfig::default())
    }

    /// Computes statistics with an explicit configuration.
    ///
    /// Accumulation happens in `f64`. NaN values propagate into mean, std
    /// and skew; `min`/`max` skip them. A sample with no value other than
    /// NaN yields NaN extrema.
    pub fn with_config(sample: &[f32], config: &StatConfig) -> Option<Self> {
        if sample.is_empty() {
            return None;
        }

        let n = sample.len() as f64;
        let mean = sample.iter().map(|&x| f64::from(x)).sum::<f64>() / n;

        let (mut m2, mut m3) = (0.0f64, 0.0f64);
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &x in sample {
            let x = f64::from(x);
            let d = x - mean;
            m2 += d * d;
            m3 += d * d * d;
            min = min.min(x);
            max = max.max(x);
        }
        if min > max {
            // nothing but NaN
            min = f64::NAN;
            max = f64::NAN;
        }

        let variance = match config.convention {
            StdConvention::Population => m2 / n,
            StdConvention::Sample if sample.len() > 1 => m2 / (n - 1.0),
            StdConvention::Sample => 0.0,
        };
        let std = variance.sqrt();
        let skew = (m3 / n) / (std.powi(3) + config.epsilon);

        Some(Self {
            mean,
            std,
            min,
            max,
            skew,
        })
    }

    /// Returns `max - min`.
    pub fn dynamic_range(&self) -> f64 {
        self.max - self.min
    }

    /// Returns the largest magnitude, the range a symmetric quantizer must cover.
    pub fn abs_max(&self) -> f64 {
        self.min.abs().max(self.max.abs())
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Writes non-finite floats as string tags, reads both forms back.
mod non_finite {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INF: &str = "inf";
    const NEG_INF: &str = "-inf";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Tag(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str(NAN)
        } else if value.is_sign_positive() {
            serializer.serialize_str(INF)
        } else {
            serializer.serialize_str(NEG_INF)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Tag(tag) => match tag.as_str() {
                NAN => Ok(f64::NAN),
                INF => Ok(f64::INFINITY),
                NEG_INF => Ok(f64::NEG_INFINITY),
                other => Err(Error::custom(format!("invalid float tag {other:?}"))),
            },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
