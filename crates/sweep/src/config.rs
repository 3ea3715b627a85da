//! Sweep configuration
//!
//! Loaded from JSON, every field optional:
//!
//! ```json
//! {
//!   "market": { "population": 1000, "initial_participants": 300 },
//!   "parameter": "density",
//!   "start": 0.001,
//!   "end": 0.1,
//!   "step": { "linear": 0.005 },
//!   "trials": 100,
//!   "seed": 42,
//!   "output": "data.out"
//! }
//! ```

use clap::ValueEnum;
use netda_core::MarketConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SweepError, SweepResult};

/// Relative slack when comparing the last point against `end`
const END_TOLERANCE: f64 = 1e-9;

/// Market parameter varied across the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    /// Small-world density
    Density,
    /// Number of agents invited before diffusion (`k0`)
    InitialParticipants,
}

impl SweepParameter {
    pub fn name(&self) -> &'static str {
        match self {
            SweepParameter::Density => "density",
            SweepParameter::InitialParticipants => "initial_participants",
        }
    }

    /// Copy of `market` with this parameter set to `value`
    pub fn apply(&self, market: &MarketConfig, value: f64) -> MarketConfig {
        let market = market.clone();
        match self {
            SweepParameter::Density => market.with_density(value),
            SweepParameter::InitialParticipants => {
                market.with_initial_participants(value.round().max(0.0) as usize)
            }
        }
    }
}

/// Distance between consecutive sweep points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Add a constant
    Linear(f64),
    /// Multiply by a constant
    Geometric(f64),
}

impl Step {
    fn validate(&self, start: f64) -> SweepResult<()> {
        match *self {
            Step::Linear(d) if !(d.is_finite() && d > 0.0) => Err(SweepError::InvalidStep(
                format!("linear step must be positive, got {}", d),
            )),
            Step::Geometric(r) if !(r.is_finite() && r > 1.0) => Err(SweepError::InvalidStep(
                format!("geometric ratio must exceed 1, got {}", r),
            )),
            Step::Geometric(_) if start <= 0.0 => Err(SweepError::InvalidStep(format!(
                "geometric sweep must start above 0, got {}",
                start
            ))),
            _ => Ok(()),
        }
    }
}

/// Root configuration of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Base market, the swept parameter is overwritten per point
    pub market: MarketConfig,
    pub parameter: SweepParameter,
    pub start: f64,
    pub end: f64,
    pub step: Step,
    /// Independent trials per point
    pub trials: usize,
    /// Base seed, trial seeds are derived from it
    pub seed: u64,
    /// Table file, appended to
    pub output: PathBuf,
    /// Worker threads per point, defaults to the number of CPUs
    pub workers: Option<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            parameter: SweepParameter::InitialParticipants,
            start: 50.0,
            end: 500.0,
            step: Step::Linear(50.0),
            trials: 100,
            seed: 42,
            output: PathBuf::from("data.out"),
            workers: None,
        }
    }
}

impl SweepConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> SweepResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SweepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> SweepResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the range, step and trial count, and the market at every point
    pub fn validate(&self) -> SweepResult<()> {
        if self.trials == 0 {
            return Err(SweepError::NoTrials);
        }
        if !(self.start.is_finite() && self.end.is_finite()) || self.start > self.end {
            return Err(SweepError::EmptyRange {
                start: self.start,
                end: self.end,
            });
        }
        self.step.validate(self.start)?;

        for value in self.points() {
            self.parameter.apply(&self.market, value).validate()?;
        }
        Ok(())
    }

    /// Parameter values from `start` up to and including `end`
    pub fn points(&self) -> Vec<f64> {
        let limit = self.end + self.end.abs().max(1.0) * END_TOLERANCE;
        let mut points = Vec::new();

        match self.step {
            Step::Linear(d) if d > 0.0 => {
                let mut index = 0usize;
                loop {
                    let value = self.start + index as f64 * d;
                    if value > limit {
                        break;
                    }
                    points.push(value);
                    index += 1;
                }
            }
            Step::Geometric(r) if r > 1.0 && self.start > 0.0 => {
                let mut value = self.start;
                while value <= limit {
                    points.push(value);
                    value *= r;
                }
            }
            _ => points.push(self.start),
        }

        points
    }

    /// Worker threads to use for `trials` trials
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(num_cpus::get)
            .clamp(1, self.trials.max(1))
    }
}
