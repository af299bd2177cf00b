//! Binned histogram reduction
//!
//! Linear binning over the observed range, widened by spec limits when they
//! fall outside it. Counts are normalized to the tallest bin for rendering.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::core::stats::StatsError;

/// Default bin count.
pub const DEFAULT_BINS: usize = 50;

/// A binned reduction of one column.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Lower edge of the first bin
    pub min: f64,

    /// Upper edge of the last bin
    pub max: f64,

    pub bin_width: f64,
    pub counts: Vec<u64>,

    /// Counts scaled so the tallest bin is 1.0
    pub normalized: Vec<f64>,
}

/// Bin one column's samples.
///
/// Spec limits widen the range when they fall outside the observed
/// extremes. A sample at the exact upper bound lands in the last bin.
pub fn build(
    samples: &[f64],
    bins: usize,
    spec_min: Option<f64>,
    spec_max: Option<f64>,
) -> Result<Histogram, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::NoSamples);
    }
    if bins == 0 {
        return Err(StatsError::DegenerateRange);
    }

    let mut min = samples.min();
    let mut max = samples.max();
    if let Some(lsl) = spec_min {
        if lsl < min {
            min = lsl;
        }
    }
    if let Some(usl) = spec_max {
        if usl > max {
            max = usl;
        }
    }

    let bin_width = (max - min) / bins as f64;
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(StatsError::DegenerateRange);
    }

    let mut counts = vec![0u64; bins];
    for &value in samples {
        let mut index = ((value - min) / bin_width) as usize;
        if index >= bins {
            index = bins - 1;
        }
        counts[index] += 1;
    }

    let tallest = counts.iter().copied().max().unwrap_or(0).max(1);
    let normalized = counts
        .iter()
        .map(|&c| c as f64 / tallest as f64)
        .collect();

    Ok(Histogram {
        min,
        max,
        bin_width,
        counts,
        normalized,
    })
}
