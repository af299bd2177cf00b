//! Per-run RMS reduction
//!
//! One column is framed into `run_count` equal contiguous blocks (integer
//! division, trailing remainder dropped) and reduced to one RMS value per
//! block. The summary reports the spread of those values as a symmetric
//! tolerance around the mean.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::core::stats::StatsError;

/// RMS statistics across the per-run blocks of one column.
#[derive(Debug, Clone, Serialize)]
pub struct RmsSummary {
    pub run_count: usize,

    /// Block length after integer division
    pub samples_per_run: usize,

    pub mean: f64,

    /// Unset for single-run files
    pub std_dev: Option<f64>,

    pub min: f64,
    pub max: f64,

    /// (max - mean) / mean
    pub tol_plus: f64,

    /// (mean - min) / mean
    pub tol_minus: f64,

    /// (max - min) / mean / 2
    pub tol_symmetric: f64,

    /// One RMS value per block
    pub per_run: Vec<f64>,
}

/// Reduce one column to per-run RMS values and summarize them.
pub fn analyze(samples: &[f64], run_count: usize) -> Result<RmsSummary, StatsError> {
    if run_count == 0 || samples.len() < run_count {
        return Err(StatsError::InsufficientSamples {
            samples: samples.len(),
            runs: run_count,
        });
    }

    let samples_per_run = samples.len() / run_count;
    let mut per_run = Vec::with_capacity(run_count);
    for block in 0..run_count {
        let chunk = &samples[block * samples_per_run..(block + 1) * samples_per_run];
        per_run.push(chunk.quadratic_mean());
    }

    let mean = per_run.as_slice().mean();
    let min = per_run.as_slice().min();
    let max = per_run.as_slice().max();
    let std_dev = (run_count >= 2).then(|| per_run.as_slice().std_dev());

    Ok(RmsSummary {
        run_count,
        samples_per_run,
        mean,
        std_dev,
        min,
        max,
        tol_plus: (max - mean) / mean,
        tol_minus: (mean - min) / mean,
        tol_symmetric: (max - min) / mean / 2.0,
        per_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_signal_rms_is_its_magnitude() {
        let samples = vec![-2.0; 8];
        let summary = analyze(&samples, 2).unwrap();

        assert_eq!(summary.samples_per_run, 4);
        assert_eq!(summary.per_run, vec![2.0, 2.0]);
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.std_dev, Some(0.0));
        assert_eq!(summary.tol_symmetric, 0.0);
    }

    #[test]
    fn test_blocks_differ() {
        // First block all 1.0, second all 3.0
        let mut samples = vec![1.0; 4];
        samples.extend(vec![3.0; 4]);
        let summary = analyze(&samples, 2).unwrap();

        assert_eq!(summary.per_run, vec![1.0, 3.0]);
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
        assert!((summary.tol_plus - 0.5).abs() < 1e-12);
        assert!((summary.tol_minus - 0.5).abs() < 1e-12);
        assert!((summary.tol_symmetric - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_remainder_samples_are_dropped() {
        // 10 samples over 3 runs: blocks of 3, the last sample ignored
        let samples = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 100.0];
        let summary = analyze(&samples, 3).unwrap();

        assert_eq!(summary.samples_per_run, 3);
        assert_eq!(summary.per_run, vec![1.0, 2.0, 4.0]);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn test_single_run_has_no_deviation() {
        let samples = [3.0, 4.0];
        let summary = analyze(&samples, 1).unwrap();
        assert_eq!(summary.std_dev, None);
        let expected = ((9.0 + 16.0) / 2.0f64).sqrt();
        assert!((summary.mean - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fewer_samples_than_runs_is_an_error() {
        let err = analyze(&[1.0, 2.0], 3).unwrap_err();
        assert_eq!(
            err,
            StatsError::InsufficientSamples {
                samples: 2,
                runs: 3
            }
        );
    }
}
