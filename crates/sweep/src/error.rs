use netda_core::ConfigError;
use netda_runner::RunnerError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while configuring or running a sweep
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid sweep step: {0}")]
    InvalidStep(String),

    #[error("Sweep range is empty: start {start} > end {end}")]
    EmptyRange { start: f64, end: f64 },

    #[error("At least one trial per point is required")]
    NoTrials,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse sweep configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid market configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Trial {trial} failed: {source}")]
    Trial {
        trial: usize,
        #[source]
        source: RunnerError,
    },

    #[error("Only {received} of {expected} trials reported back")]
    MissingTrials { received: usize, expected: usize },
}

pub type SweepResult<T> = std::result::Result<T, SweepError>;
