//! Process capability - Cpk, out-of-spec probability, yield, Ppm
//!
//! Models each parameter as normally distributed and integrates the tails
//! beyond the spec limits. An undefined bound contributes nothing to the
//! minimum, so one-sided specs work naturally.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

/// The normal model could not be constructed for a parameter, typically
/// because the standard deviation is zero or not finite.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("normal model rejected (mean {mean}, std dev {std_dev})")]
pub struct NormalModelError {
    pub mean: f64,
    pub std_dev: f64,
}

/// Capability of one parameter against its spec limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Capability {
    /// min over defined bounds of (margin to limit) / 3σ
    pub cpk: f64,

    /// Estimated out-of-spec rate in parts per million
    pub ppm: f64,

    /// Estimated in-spec fraction, 1 - P(out of spec)
    pub yield_fraction: f64,
}

/// Compute capability from a parameter's mean and bias-corrected standard
/// deviation. At least one spec limit must be given; call sites guard this.
///
/// Pure in its inputs: repeated calls on the same snapshot give identical
/// results.
pub fn capability(
    mean: f64,
    std_dev: f64,
    spec_min: Option<f64>,
    spec_max: Option<f64>,
) -> Result<Capability, NormalModelError> {
    let normal = Normal::new(mean, std_dev).map_err(|_| NormalModelError { mean, std_dev })?;

    let mut cpk = f64::INFINITY;
    let mut out_of_spec = 0.0;

    if let Some(usl) = spec_max {
        cpk = cpk.min((usl - mean) / (3.0 * std_dev));
        out_of_spec += 1.0 - normal.cdf(usl);
    }
    if let Some(lsl) = spec_min {
        cpk = cpk.min((mean - lsl) / (3.0 * std_dev));
        out_of_spec += normal.cdf(lsl);
    }

    Ok(Capability {
        cpk,
        ppm: out_of_spec * 1e6,
        yield_fraction: 1.0 - out_of_spec,
    })
}

/// Exact count of samples strictly above the limit.
pub fn count_above(samples: &[f64], limit: f64) -> usize {
    samples.iter().filter(|&&v| v > limit).count()
}

/// Exact count of samples strictly below the limit.
pub fn count_below(samples: &[f64], limit: f64) -> usize {
    samples.iter().filter(|&&v| v < limit).count()
}
