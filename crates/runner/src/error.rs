use netda_core::ConfigError;
use netda_matching::MatchingError;
use thiserror::Error;

use crate::diffusion::Phase;

/// Errors surfaced by a mechanism run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunnerError {
    #[error("Invalid market configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Matching failed: {0}")]
    Matching(#[from] MatchingError),

    #[error("Diffusion stopped before convergence (phase {0:?})")]
    NotConverged(Phase),
}

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
