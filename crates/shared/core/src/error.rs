use thiserror::Error;

/// Invalid market configuration, raised at generation time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Population must contain at least one agent")]
    EmptyPopulation,

    #[error("Seller range [{low}, {high}] must satisfy low <= high <= population ({population})")]
    SellerRange {
        low: usize,
        high: usize,
        population: usize,
    },

    #[error("Value range [{low}, {high}] is inverted")]
    ValueRange { low: u64, high: u64 },

    #[error("Rewiring probability must lie in [0, 1], got {0}")]
    RewireProbability(f64),

    #[error("Network density must lie in [0, 1], got {0}")]
    Density(f64),

    #[error("Agent values ({values}) do not match the population ({population})")]
    ValueCount { values: usize, population: usize },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
