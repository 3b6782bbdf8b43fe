//! Solver configuration.
//!
//! [`GAConfig`] carries every construction parameter of the genetic
//! algorithm plus the stopping rules used by the run loop. It can be built in
//! code with struct-update syntax over [`Default`], or loaded from a JSON file
//! in which any missing field keeps its default.

use crate::error::ConfigError;
use crate::instance::Bounds;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Genetic Algorithm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GAConfig {
    /// Number of cities in a randomly generated instance
    pub city_count: usize,
    /// Population size
    pub population_size: usize,
    /// Range of generated x coordinates
    pub x_bounds: Bounds,
    /// Range of generated y coordinates
    pub y_bounds: Bounds,
    /// Crossover probability
    pub crossover_prob: f64,
    /// Mutation probability
    pub mutation_prob: f64,
    /// Random seed
    pub seed: u64,
    /// Stop after this many generations
    pub max_generations: Option<usize>,
    /// Stop after this many consecutive generations without improvement
    pub max_no_improve: Option<usize>,
    /// Breeding attempts per generation before the remaining slots are
    /// filled with fresh tours. `None` means 100 per population slot.
    pub max_breeding_attempts: Option<usize>,
}

impl Default for GAConfig {
    fn default() -> Self {
        GAConfig {
            city_count: 20,
            population_size: 30,
            x_bounds: Bounds::new(0.0, 1000.0),
            y_bounds: Bounds::new(0.0, 500.0),
            crossover_prob: 0.9,
            mutation_prob: 0.02,
            seed: 17,
            max_generations: None,
            max_no_improve: Some(10_000),
            max_breeding_attempts: None,
        }
    }
}

impl GAConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: GAConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Breeding attempts allowed per generation
    pub fn breeding_attempts(&self) -> usize {
        self.max_breeding_attempts
            .unwrap_or_else(|| self.population_size.saturating_mul(100))
    }

    /// Check every parameter that does not depend on the instance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 3 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        check_probability("crossover_prob", self.crossover_prob)?;
        check_probability("mutation_prob", self.mutation_prob)?;
        if !self.x_bounds.is_valid() {
            return Err(ConfigError::InvalidBounds {
                axis: "x",
                min: self.x_bounds.min,
                max: self.x_bounds.max,
            });
        }
        if !self.y_bounds.is_valid() {
            return Err(ConfigError::InvalidBounds {
                axis: "y",
                min: self.y_bounds.min,
                max: self.y_bounds.max,
            });
        }
        Ok(())
    }

    /// Check that `city_count` cities can host a population of distinct tours.
    pub fn validate_for_cities(&self, city_count: usize) -> Result<(), ConfigError> {
        if city_count < 2 {
            return Err(ConfigError::TooFewCities(city_count));
        }
        let permutations = permutations_up_to(city_count, self.population_size as u128);
        if permutations < self.population_size as u128 {
            return Err(ConfigError::PopulationExceedsPermutations {
                population: self.population_size,
                cities: city_count,
                permutations,
            });
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

/// `n!`, or the first partial product that reaches `cap`.
fn permutations_up_to(n: usize, cap: u128) -> u128 {
    let mut product: u128 = 1;
    for k in 2..=n as u128 {
        product = product.saturating_mul(k);
        if product >= cap {
            break;
        }
    }
    product
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GAConfig::default();
        assert_eq!(config.city_count, 20);
        assert_eq!(config.population_size, 30);
        assert_eq!(config.seed, 17);
        assert!(config.validate().is_ok());
        assert!(config.validate_for_cities(config.city_count).is_ok());
        assert_eq!(config.breeding_attempts(), 3000);
    }

    #[test]
    fn test_small_population_rejected() {
        let config = GAConfig {
            population_size: 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PopulationTooSmall(2))));
    }

    #[test]
    fn test_probabilities_checked() {
        let config = GAConfig {
            crossover_prob: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "crossover_prob", .. })
        ));

        let config = GAConfig {
            mutation_prob: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GAConfig {
            mutation_prob: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = GAConfig {
            y_bounds: Bounds::new(10.0, 0.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { axis: "y", .. })
        ));
    }

    #[test]
    fn test_population_must_fit_permutations() {
        let config = GAConfig {
            population_size: 7,
            ..Default::default()
        };
        assert!(config.validate_for_cities(1).is_err());
        assert!(matches!(
            config.validate_for_cities(3),
            Err(ConfigError::PopulationExceedsPermutations { permutations: 6, .. })
        ));
        assert!(config.validate_for_cities(4).is_ok());
    }

    #[test]
    fn test_json_fields_default_when_missing() {
        let config: GAConfig =
            serde_json::from_str(r#"{ "population_size": 50, "seed": 3 }"#).unwrap();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.seed, 3);
        assert_eq!(config.city_count, 20);
        assert_eq!(config.max_no_improve, Some(10_000));
    }
}
