//! Column statistics, c4 bias correction, and spec-limit pairing
//!
//! Statistics run over the whole file; only operations that explicitly work
//! per run (duty cycle, RMS) look at run boundaries. The deviation of each
//! column is corrected for the number of independent runs via c4(n).

use serde::Serialize;
use statrs::function::gamma::ln_gamma;
use statrs::statistics::Statistics;
use thiserror::Error;

use crate::core::capability;
use crate::core::runs::RunSet;
use crate::raw::Matrix;

/// Recoverable numeric conditions surfaced during an analysis pass.
///
/// These leave the affected parameter's derived fields unset; the rest of
/// the pass continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("bias correction needs at least 2 runs, file has {0}")]
    DegenerateRuns(usize),

    #[error("parameter '{name}': normal model rejected (mean {mean}, std dev {std_dev})")]
    InvalidNormal {
        name: String,
        mean: f64,
        std_dev: f64,
    },

    #[error("spec-limit column '{limit}' has no matching measurement column")]
    UnpairedLimit { limit: String },

    #[error("column has no samples to analyze")]
    NoSamples,

    #[error("{samples} samples cannot be framed into {runs} runs")]
    InsufficientSamples { samples: usize, runs: usize },

    #[error("no full duty cycles detected")]
    NoDutyCycles,

    #[error("histogram range is degenerate")]
    DegenerateRange,
}

/// Bias-correction factor c4(n) for the sample standard deviation.
///
/// c4(n) = sqrt(2/(n-1)) * Γ(n/2) / Γ((n-1)/2). Above n = 100 the gamma
/// ratio is replaced by the asymptotic form 4(n-1)/(4n-3), which stays
/// within 1e-3 of the exact value at the switchover.
pub fn c4(n: usize) -> Result<f64, StatsError> {
    if n < 2 {
        return Err(StatsError::DegenerateRuns(n));
    }
    let nf = n as f64;
    if n > 100 {
        return Ok(4.0 * (nf - 1.0) / (4.0 * nf - 3.0));
    }
    let ratio = (ln_gamma(nf / 2.0) - ln_gamma((nf - 1.0) / 2.0)).exp();
    Ok((2.0 / (nf - 1.0)).sqrt() * ratio)
}

/// Per-column derived statistics and process-capability results.
///
/// `std_dev` is the bias-corrected sample standard deviation
/// (s / c4(runs)); it is unset for single-run files. Capability fields stay
/// unset until spec limits are paired and the normal model holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub observed_min: f64,
    pub observed_max: f64,
    pub spec_min: Option<f64>,
    pub spec_max: Option<f64>,
    pub cpk: Option<f64>,
    pub ppm: Option<f64>,
    pub yield_fraction: Option<f64>,
    pub above_spec_count: usize,
    pub below_spec_count: usize,
}

/// Parameter table built from a decoded matrix in three passes: raw
/// statistics, spec-limit pairing, process capability.
///
/// Owns one mutable row per column while building; immutable once returned.
#[derive(Debug, Clone)]
pub struct ParameterTable {
    run_count: usize,
    correction: Option<f64>,
    parameters: Vec<Parameter>,
    diagnostics: Vec<StatsError>,
}

impl ParameterTable {
    pub fn build(matrix: &Matrix, names: &[String], runs: &RunSet) -> ParameterTable {
        let mut diagnostics = Vec::new();
        let run_count = runs.count();
        let correction = match c4(run_count) {
            Ok(factor) => Some(factor),
            Err(err) => {
                diagnostics.push(err);
                None
            }
        };

        let mut table = ParameterTable {
            run_count,
            correction,
            parameters: Vec::with_capacity(names.len()),
            diagnostics,
        };
        table.raw_statistics(matrix, names);
        table.pair_spec_limits();
        table.analyze_capability(matrix);
        table
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Parameters excluding the time column.
    pub fn measurements(&self) -> &[Parameter] {
        self.parameters.get(1..).unwrap_or(&[])
    }

    pub fn diagnostics(&self) -> &[StatsError] {
        &self.diagnostics
    }

    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// The c4(runs) factor applied to the raw deviations, when defined.
    pub fn correction(&self) -> Option<f64> {
        self.correction
    }

    fn raw_statistics(&mut self, matrix: &Matrix, names: &[String]) {
        for (i, name) in names.iter().enumerate() {
            let col = matrix.column(i);
            let std_dev = match self.correction {
                Some(factor) if col.len() >= 2 => Some(col.std_dev() / factor),
                _ => None,
            };
            self.parameters.push(Parameter {
                name: name.clone(),
                mean: col.mean(),
                std_dev,
                observed_min: col.min(),
                observed_max: col.max(),
                spec_min: None,
                spec_max: None,
                cpk: None,
                ppm: None,
                yield_fraction: None,
                above_spec_count: 0,
                below_spec_count: 0,
            });
        }
    }

    /// Pair `<base>_min)` / `<base>_max)` columns with their `<base>)`
    /// measurement. Limit columns carry one constant value per case, so
    /// their mean is exactly the configured limit. A missing base column
    /// is reported and skipped; duplicate pairings overwrite, last match
    /// wins.
    fn pair_spec_limits(&mut self) {
        for i in 1..self.parameters.len() {
            let name = self.parameters[i].name.clone();
            let limit_mean = self.parameters[i].mean;

            if let Some(base) = name.strip_suffix("_min)") {
                match self.find_measurement(&format!("{base})")) {
                    Some(j) => self.parameters[j].spec_min = Some(limit_mean),
                    None => self
                        .diagnostics
                        .push(StatsError::UnpairedLimit { limit: name.clone() }),
                }
            }
            if let Some(base) = name.strip_suffix("_max)") {
                match self.find_measurement(&format!("{base})")) {
                    Some(j) => self.parameters[j].spec_max = Some(limit_mean),
                    None => self
                        .diagnostics
                        .push(StatsError::UnpairedLimit { limit: name }),
                }
            }
        }
    }

    fn find_measurement(&self, target: &str) -> Option<usize> {
        self.parameters
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, p)| p.name == target)
            .map(|(j, _)| j)
    }

    fn analyze_capability(&mut self, matrix: &Matrix) {
        let Self {
            parameters,
            diagnostics,
            ..
        } = self;

        for (i, param) in parameters.iter_mut().enumerate().skip(1) {
            if param.spec_min.is_none() && param.spec_max.is_none() {
                continue;
            }

            let col = matrix.column(i);
            if let Some(usl) = param.spec_max {
                param.above_spec_count = capability::count_above(col, usl);
            }
            if let Some(lsl) = param.spec_min {
                param.below_spec_count = capability::count_below(col, lsl);
            }

            let Some(std_dev) = param.std_dev else {
                continue;
            };
            match capability::capability(param.mean, std_dev, param.spec_min, param.spec_max) {
                Ok(cap) => {
                    param.cpk = Some(cap.cpk);
                    param.ppm = Some(cap.ppm);
                    param.yield_fraction = Some(cap.yield_fraction);
                }
                Err(err) => diagnostics.push(StatsError::InvalidNormal {
                    name: param.name.clone(),
                    mean: err.mean,
                    std_dev: err.std_dev,
                }),
            }
        }
    }
}
