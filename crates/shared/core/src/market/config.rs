//! Market generation parameters
//!
//! Defaults: 1000 agents split evenly,
//! integer values in [0, 10000], a Watts-Strogatz network with rewiring
//! probability 0.3 and density 0.3, and 300 initially invited agents.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Inclusive range for the number of sellers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerRange {
    pub low: usize,
    pub high: usize,
}

/// Inclusive range for private values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: u64,
    pub high: u64,
}

/// Watts-Strogatz parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmallWorldConfig {
    /// Probability that each lattice edge is rewired
    pub rewire_prob: f64,
    /// Fraction of the population each agent is linked to before rewiring
    /// (`density * n / 2` neighbors per side)
    pub density: f64,
}

impl Default for SmallWorldConfig {
    fn default() -> Self {
        Self {
            rewire_prob: 0.3,
            density: 0.3,
        }
    }
}

impl SmallWorldConfig {
    /// Lattice neighbors per side for a population of `population`
    pub fn neighbors_per_side(&self, population: usize) -> usize {
        let nei = (self.density * population as f64 / 2.0).floor() as usize;
        nei.min(population.saturating_sub(1) / 2)
    }
}

/// Configuration of one generated market instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Total number of agents (`n`)
    pub population: usize,
    /// Number of sellers is drawn uniformly from this range
    pub seller_range: SellerRange,
    /// Private values are drawn uniformly from this range
    pub value_range: ValueRange,
    /// Social network shape
    pub small_world: SmallWorldConfig,
    /// Number of agents invited before diffusion starts (`k0`)
    pub initial_participants: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            population: 1000,
            seller_range: SellerRange { low: 500, high: 500 },
            value_range: ValueRange { low: 0, high: 10_000 },
            small_world: SmallWorldConfig::default(),
            initial_participants: 300,
        }
    }
}

impl MarketConfig {
    /// Check every range before generating
    pub fn validate(&self) -> ConfigResult<()> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let SellerRange { low, high } = self.seller_range;
        if low > high || high > self.population {
            return Err(ConfigError::SellerRange {
                low,
                high,
                population: self.population,
            });
        }

        let ValueRange { low, high } = self.value_range;
        if low > high {
            return Err(ConfigError::ValueRange { low, high });
        }

        let p = self.small_world.rewire_prob;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::RewireProbability(p));
        }

        let d = self.small_world.density;
        if !(0.0..=1.0).contains(&d) {
            return Err(ConfigError::Density(d));
        }

        Ok(())
    }

    /// Set population and an even seller split (builder pattern)
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self.seller_range = SellerRange {
            low: population / 2,
            high: population / 2,
        };
        self
    }

    /// Set seller range (builder pattern)
    pub fn with_seller_range(mut self, low: usize, high: usize) -> Self {
        self.seller_range = SellerRange { low, high };
        self
    }

    /// Set value range (builder pattern)
    pub fn with_value_range(mut self, low: u64, high: u64) -> Self {
        self.value_range = ValueRange { low, high };
        self
    }

    /// Set network density (builder pattern)
    pub fn with_density(mut self, density: f64) -> Self {
        self.small_world.density = density;
        self
    }

    /// Set rewiring probability (builder pattern)
    pub fn with_rewire_prob(mut self, rewire_prob: f64) -> Self {
        self.small_world.rewire_prob = rewire_prob;
        self
    }

    /// Set initial participant count (builder pattern)
    pub fn with_initial_participants(mut self, count: usize) -> Self {
        self.initial_participants = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MarketConfig::default().validate().is_ok());
    }

    #[test]
    fn test_seller_range_above_population_rejected() {
        let config = MarketConfig::default()
            .with_population(10)
            .with_seller_range(3, 11);

        assert_eq!(
            config.validate(),
            Err(ConfigError::SellerRange {
                low: 3,
                high: 11,
                population: 10
            })
        );
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let sellers = MarketConfig::default().with_seller_range(6, 5);
        assert!(matches!(
            sellers.validate(),
            Err(ConfigError::SellerRange { .. })
        ));

        let values = MarketConfig::default().with_value_range(10, 1);
        assert_eq!(
            values.validate(),
            Err(ConfigError::ValueRange { low: 10, high: 1 })
        );
    }

    #[test]
    fn test_probabilities_bounded() {
        let config = MarketConfig::default().with_rewire_prob(1.5);
        assert_eq!(config.validate(), Err(ConfigError::RewireProbability(1.5)));

        let config = MarketConfig::default().with_density(-0.1);
        assert_eq!(config.validate(), Err(ConfigError::Density(-0.1)));
    }

    #[test]
    fn test_empty_population_rejected() {
        let config = MarketConfig::default().with_population(0);
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn test_neighbors_per_side() {
        let sw = SmallWorldConfig {
            rewire_prob: 0.0,
            density: 0.3,
        };
        assert_eq!(sw.neighbors_per_side(1000), 150);
        // Clamped so the ring never wraps onto itself
        let dense = SmallWorldConfig {
            rewire_prob: 0.0,
            density: 1.0,
        };
        assert_eq!(dense.neighbors_per_side(10), 4);
        assert_eq!(dense.neighbors_per_side(1), 0);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: MarketConfig =
            serde_json::from_str(r#"{ "population": 40, "initial_participants": 5 }"#).unwrap();

        assert_eq!(config.population, 40);
        assert_eq!(config.initial_participants, 5);
        assert_eq!(config.value_range, ValueRange { low: 0, high: 10_000 });
    }
}
