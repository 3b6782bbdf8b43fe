//! Genetic Algorithm for the TSP.
//!
//! One call to [`GeneticAlgorithm::advance_one_generation`] builds the next
//! population:
//! - the best and second best tours are copied over unchanged (elitism)
//! - parent pairs are drawn by roulette wheel selection
//! - offspring come from multi-point crossover with repair, then swap mutation
//! - an offspring identical to a tour already in the next population is dropped
//!
//! The generation ends as soon as the next population is full, after which it
//! replaces the current one. Stopping rules live in [`crate::driver`].

use crate::config::GAConfig;
use crate::error::ConfigError;
use crate::fitness::Scores;
use crate::instance::TspInstance;
use crate::operators::{multi_point_crossover, select_parents, swap_mutation};
use crate::population::{Chromosome, Population};
use crate::rng::{RandomSource, SeededRandom};

/// Genetic Algorithm implementation
pub struct GeneticAlgorithm<R: RandomSource = SeededRandom> {
    config: GAConfig,
    instance: TspInstance,
    population: Population,
    /// Scores of the current population, rebuilt after every swap
    scores: Scores,
    rng: R,
    generation: usize,
    immigrant_fills: usize,
}

impl GeneticAlgorithm<SeededRandom> {
    /// Generate a random instance of `config.city_count` cities and an
    /// initial population, both from `config.seed`.
    pub fn new(config: GAConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        config.validate_for_cities(config.city_count)?;

        let mut rng = SeededRandom::new(config.seed);
        let instance =
            TspInstance::random(config.city_count, config.x_bounds, config.y_bounds, &mut rng)?;

        Self::with_random_source(config, instance, rng)
    }

    /// Solve a given instance; `config.city_count` and the bounds are ignored.
    pub fn with_instance(config: GAConfig, instance: TspInstance) -> Result<Self, ConfigError> {
        let rng = SeededRandom::new(config.seed);
        Self::with_random_source(config, instance, rng)
    }
}

impl<R: RandomSource> GeneticAlgorithm<R> {
    /// Build the solver around an explicit random source. The initial
    /// population is drawn from `rng`.
    pub fn with_random_source(
        config: GAConfig,
        instance: TspInstance,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.validate_for_cities(instance.dimension())?;

        let population = Population::random(config.population_size, instance.dimension(), &mut rng);
        let scores = Scores::evaluate(&instance, population.chromosomes());

        log::debug!(
            "[GA] Initialized population: {} tours over {} cities, average distance {:.3}",
            population.size(),
            instance.dimension(),
            scores.average_distance()
        );

        Ok(GeneticAlgorithm {
            config,
            instance,
            population,
            scores,
            rng,
            generation: 0,
            immigrant_fills: 0,
        })
    }

    /// Replace the current population with the next generation.
    pub fn advance_one_generation(&mut self) {
        let best = self.scores.best();
        let runner_up = self.scores.runner_up(best);
        self.population.carry_over(best);
        self.population.carry_over(runner_up);

        let max_attempts = self.config.breeding_attempts();
        let fitness = self.scores.fitness();
        let mut attempts = 0;

        while !self.population.is_next_full() && attempts < max_attempts {
            attempts += 1;

            let (a, b) = select_parents(fitness, &mut self.rng);
            let (mut offspring_a, mut offspring_b) = multi_point_crossover(
                self.population.get(a),
                self.population.get(b),
                self.config.crossover_prob,
                &mut self.rng,
            );
            swap_mutation(&mut offspring_a, self.config.mutation_prob, &mut self.rng);
            swap_mutation(&mut offspring_b, self.config.mutation_prob, &mut self.rng);

            self.population.try_insert(offspring_a);
            if self.population.is_next_full() {
                break;
            }
            self.population.try_insert(offspring_b);
        }

        if !self.population.is_next_full() {
            log::warn!(
                "[GA] Gen {}: {} breeding attempts produced {}/{} distinct tours, filling the rest with fresh tours",
                self.generation + 1,
                attempts,
                self.population.next_len(),
                self.population.size()
            );
            self.fill_with_immigrants();
        }

        debug_assert!(self.population.next_generation().iter().all(Chromosome::is_valid));

        self.population.swap_generations();
        self.scores = Scores::evaluate(&self.instance, self.population.chromosomes());
        self.generation += 1;
    }

    /// Fill the open slots with tours not yet in the next generation.
    ///
    /// Candidates are enumerated in lexicographic order from a random start,
    /// so at most `n!` candidates are tried. Configuration validation ensures
    /// `n!` is at least the population size.
    fn fill_with_immigrants(&mut self) {
        let mut candidate = Chromosome::random(self.instance.dimension(), &mut self.rng);
        while !self.population.is_next_full() {
            self.population.try_insert(candidate.clone());
            candidate.next_permutation();
        }
        self.immigrant_fills += 1;
    }

    /// Index of the best tour in the current population
    pub fn best_index(&self) -> usize {
        self.scores.best()
    }

    /// The best tour in the current population
    pub fn best_chromosome(&self) -> &Chromosome {
        self.population.get(self.best_index())
    }

    pub fn best_tour(&self) -> &[usize] {
        self.best_chromosome().genes()
    }

    /// Fitness of the best tour in the current population
    pub fn best_fitness(&self) -> f64 {
        self.scores.fitness()[self.best_index()]
    }

    /// Length of the best tour in the current population
    pub fn best_tour_distance(&self) -> f64 {
        self.scores.distances()[self.best_index()]
    }

    /// Best tour as comma separated city indices
    pub fn best_path_string(&self) -> String {
        self.best_chromosome().to_string()
    }

    /// Mean tour length of the current population
    pub fn average_tour_distance(&self) -> f64 {
        self.scores.average_distance()
    }

    /// Number of completed generations
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Generations that needed fresh tours to fill the population
    pub fn immigrant_fills(&self) -> usize {
        self.immigrant_fills
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn instance(&self) -> &TspInstance {
        &self.instance
    }

    pub fn config(&self) -> &GAConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::City;

    fn small_config() -> GAConfig {
        GAConfig {
            city_count: 12,
            population_size: 20,
            seed: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_genetic_algorithm() {
        let mut ga = GeneticAlgorithm::new(small_config()).unwrap();
        let initial_average = ga.average_tour_distance();

        for _ in 0..200 {
            ga.advance_one_generation();
        }

        assert_eq!(ga.generation(), 200);
        assert_eq!(ga.population().chromosomes().len(), 20);
        assert!(ga.population().chromosomes().iter().all(Chromosome::is_valid));
        assert!(ga.best_tour_distance() < initial_average);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let config = GAConfig {
            city_count: 1,
            ..Default::default()
        };
        assert!(matches!(
            GeneticAlgorithm::new(config),
            Err(ConfigError::TooFewCities(1))
        ));

        let config = GAConfig {
            population_size: 2,
            ..Default::default()
        };
        assert!(GeneticAlgorithm::new(config).is_err());

        let config = GAConfig {
            mutation_prob: 2.0,
            ..Default::default()
        };
        assert!(GeneticAlgorithm::new(config).is_err());
    }

    #[test]
    fn test_elites_survive() {
        let mut ga = GeneticAlgorithm::new(small_config()).unwrap();
        for _ in 0..50 {
            let best = ga.best_chromosome().clone();
            let runner_up = ga
                .population()
                .get(ga.scores().runner_up(ga.best_index()))
                .clone();

            ga.advance_one_generation();

            assert_eq!(ga.population().get(0), &best);
            assert_eq!(ga.population().get(1), &runner_up);
        }
    }

    #[test]
    fn test_bred_offspring_are_distinct() {
        let mut ga = GeneticAlgorithm::new(small_config()).unwrap();
        for _ in 0..30 {
            ga.advance_one_generation();
            let chromosomes = ga.population().chromosomes();
            for i in 2..chromosomes.len() {
                for j in 0..i {
                    assert_ne!(chromosomes[i], chromosomes[j]);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GeneticAlgorithm::new(small_config()).unwrap();
        let mut b = GeneticAlgorithm::new(small_config()).unwrap();
        for _ in 0..100 {
            a.advance_one_generation();
            b.advance_one_generation();
        }
        assert_eq!(a.best_tour(), b.best_tour());
        assert_eq!(a.average_tour_distance(), b.average_tour_distance());
    }

    #[test]
    fn test_best_path_string() {
        let instance = TspInstance::from_cities(
            "triangle",
            vec![City::new(0.0, 0.0), City::new(1.0, 0.0), City::new(0.0, 1.0)],
        )
        .unwrap();
        let config = GAConfig {
            population_size: 3,
            ..Default::default()
        };
        let ga = GeneticAlgorithm::with_instance(config, instance).unwrap();

        let path = ga.best_path_string();
        let genes: Vec<usize> = path.split(',').map(|g| g.parse().unwrap()).collect();
        assert_eq!(genes, ga.best_tour());
        assert!((ga.best_fitness() - 1.0 / ga.best_tour_distance()).abs() < 1e-12);
    }
}
