//! Run segmentation - partitioning matrix rows at time-axis resets
//!
//! Stepped and Monte-Carlo simulations concatenate several passes into one
//! file, each restarting its time axis at zero. The run count feeds the
//! bias-correction factor and the RMS block framing.

/// Ordered half-open row intervals, one per simulation run.
///
/// Invariant: intervals are contiguous, non-overlapping, and cover every
/// row exactly once. There is always at least one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSet {
    runs: Vec<(usize, usize)>,
}

impl RunSet {
    /// Partition rows into runs. A new run starts at every interior row
    /// whose time value is exactly zero; the resetting row belongs to the
    /// new run.
    pub fn segment(time: &[f64]) -> RunSet {
        let mut runs = Vec::new();
        let mut start = 0;

        for (i, &t) in time.iter().enumerate().skip(1) {
            if t == 0.0 {
                runs.push((start, i));
                start = i;
            }
        }
        runs.push((start, time.len()));

        RunSet { runs }
    }

    /// Number of runs. Never zero.
    pub fn count(&self) -> usize {
        self.runs.len()
    }

    /// Iterate over `(start, end)` row intervals.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.runs.iter().copied()
    }

    pub fn as_slice(&self) -> &[(usize, usize)] {
        &self.runs
    }
}
