//! Duty-cycle extraction - threshold-crossing edge detection per run
//!
//! A two-state machine walks one run's samples against a shared threshold.
//! Alternating high/low interval durations become duty-cycle samples, and a
//! single one-sigma clipping pass removes outliers (including the settling
//! artifact at the start of each run) before the final statistics.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::core::runs::RunSet;
use crate::core::stats::StatsError;
use crate::raw::Matrix;

/// Edge direction of a detected threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Edge {
    Rising,
    Falling,
}

/// One detected threshold crossing within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Row offset within the run
    pub row: usize,
    pub direction: Edge,
}

/// Signal level tracked by the edge detector.
enum Level {
    Low,
    High,
}

/// Detect threshold crossings in one run's samples.
///
/// The initial state comes from comparing the first sample to the
/// threshold. Crossings use strict inequality in both directions, so a
/// value sitting exactly on the threshold never transitions.
pub fn detect_edges(samples: &[f64], mid: f64) -> Vec<Transition> {
    let Some(&first) = samples.first() else {
        return Vec::new();
    };

    let mut state = if first > mid { Level::High } else { Level::Low };
    let mut transitions = Vec::new();

    for (i, &value) in samples.iter().enumerate().skip(1) {
        match state {
            Level::Low if value > mid => {
                state = Level::High;
                transitions.push(Transition {
                    row: i,
                    direction: Edge::Rising,
                });
            }
            Level::High if value < mid => {
                state = Level::Low;
                transitions.push(Transition {
                    row: i,
                    direction: Edge::Falling,
                });
            }
            _ => {}
        }
    }

    transitions
}

/// Convert one run's transitions into duty-cycle samples.
///
/// The first transition anchors the time origin and the second is an
/// incomplete half-cycle, so full samples start at the third. Each sample
/// is the fraction of a two-interval period spent high, with the numerator
/// picked by edge direction so duty is high-time over period no matter
/// which half of the waveform is seen first. Fewer than four transitions
/// produce no samples.
pub fn duty_cycle_samples(time: &[f64], transitions: &[Transition]) -> Vec<f64> {
    let mut samples = Vec::new();
    let mut interval_start = 0.0;
    let mut previous_interval = 0.0;

    for (i, tr) in transitions.iter().enumerate() {
        let t = time[tr.row];
        if i == 0 {
            interval_start = t;
            continue;
        }
        if i == 1 {
            continue;
        }

        let interval = t - interval_start;
        if i % 2 == 1 {
            let period = interval + previous_interval;
            let duty = match tr.direction {
                Edge::Falling => interval / period,
                Edge::Rising => 1.0 - interval / period,
            };
            samples.push(duty);
        }

        previous_interval = interval;
        interval_start = t;
    }

    samples
}

/// Duty-cycle statistics over all runs of one column.
#[derive(Debug, Clone, Serialize)]
pub struct DutyCycleSummary {
    /// Threshold the edges were detected against
    pub threshold: f64,

    pub run_count: usize,

    /// Samples retained after outlier clipping
    pub sample_count: usize,

    /// Samples discarded by the one-sigma clip
    pub discarded: usize,

    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Analyze the duty cycle of `column` across every run.
///
/// The threshold defaults to the mid level between the column's observed
/// extremes and is shared by all runs. Runs yielding one transition or
/// none contribute no samples and are skipped silently.
pub fn analyze(
    matrix: &Matrix,
    column: usize,
    runs: &RunSet,
    threshold: Option<f64>,
) -> Result<DutyCycleSummary, StatsError> {
    let signal = matrix.column(column);
    if signal.is_empty() {
        return Err(StatsError::NoSamples);
    }
    let time = matrix.time();

    let mid = threshold.unwrap_or_else(|| {
        let lo = signal.min();
        let hi = signal.max();
        lo + (hi - lo) / 2.0
    });

    let mut collected = Vec::new();
    for (start, end) in runs.iter() {
        let transitions = detect_edges(&signal[start..end], mid);
        collected.extend(duty_cycle_samples(&time[start..end], &transitions));
    }

    if collected.is_empty() {
        return Err(StatsError::NoDutyCycles);
    }

    let (retained, discarded) = clip_one_sigma(&collected);
    let mean = retained.as_slice().mean();
    let std_dev = if retained.len() >= 2 {
        retained.as_slice().std_dev()
    } else {
        0.0
    };

    Ok(DutyCycleSummary {
        threshold: mid,
        run_count: runs.count(),
        sample_count: retained.len(),
        discarded,
        mean,
        std_dev,
        min: retained.as_slice().min(),
        max: retained.as_slice().max(),
    })
}

/// Single clipping pass: drop samples outside [mean - sigma, mean + sigma],
/// then the caller recomputes statistics on what remains. At least one
/// sample always survives.
fn clip_one_sigma(samples: &[f64]) -> (Vec<f64>, usize) {
    if samples.len() < 2 {
        return (samples.to_vec(), 0);
    }
    let mean = samples.mean();
    let sigma = samples.std_dev();
    let retained: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|v| *v >= mean - sigma && *v <= mean + sigma)
        .collect();
    let discarded = samples.len() - retained.len();
    (retained, discarded)
}
