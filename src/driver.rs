//! Run loop and stopping rules.
//!
//! The generation step never decides when to stop. This module tracks the
//! best fitness seen so far and the number of generations since it last
//! improved, and stops on a generation cap, a stagnation cap, or both.

use crate::config::GAConfig;
use crate::error::ConfigError;
use crate::genetic::GeneticAlgorithm;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// When to stop a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    /// Stop after this many generations
    pub max_generations: Option<usize>,
    /// Stop after this many consecutive generations without improvement
    pub max_no_improve: Option<usize>,
}

impl Termination {
    /// At least one of the limits must be set.
    pub fn new(
        max_generations: Option<usize>,
        max_no_improve: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if max_generations.is_none() && max_no_improve.is_none() {
            return Err(ConfigError::NoStoppingRule);
        }
        Ok(Termination {
            max_generations,
            max_no_improve,
        })
    }

    pub fn from_config(config: &GAConfig) -> Result<Self, ConfigError> {
        Self::new(config.max_generations, config.max_no_improve)
    }

    fn should_stop(&self, progress: &Progress) -> bool {
        self.max_generations
            .map_or(false, |max| progress.generations >= max)
            || self
                .max_no_improve
                .map_or(false, |max| progress.without_improvement >= max)
    }
}

/// Best fitness so far and the stagnation counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub generations: usize,
    pub best_fitness: f64,
    pub without_improvement: usize,
}

impl Default for Progress {
    fn default() -> Self {
        Progress {
            generations: 0,
            best_fitness: f64::NEG_INFINITY,
            without_improvement: 0,
        }
    }
}

impl Progress {
    /// Record the best fitness of a completed generation. Returns true if it
    /// improved on every earlier generation.
    pub fn record(&mut self, fitness: f64) -> bool {
        self.generations += 1;
        if fitness > self.best_fitness {
            self.best_fitness = fitness;
            self.without_improvement = 0;
            true
        } else {
            self.without_improvement += 1;
            false
        }
    }
}

/// Outcome of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub cities: usize,
    pub population_size: usize,
    pub generations: usize,
    pub generations_without_improvement: usize,
    pub best_tour: Vec<usize>,
    pub best_fitness: f64,
    pub best_distance: f64,
    pub average_distance: f64,
    pub initial_average_distance: f64,
    pub immigrant_fills: usize,
    pub computation_time: f64,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self.best_tour.iter().map(|c| c.to_string()).collect();
        writeln!(f, "Number of generations: {}", self.generations)?;
        writeln!(f, "Best chromosome info:")?;
        writeln!(f, "\t-Path: {}", path.join(","))?;
        writeln!(f, "\t-Goal function: {}", self.best_fitness)?;
        writeln!(f, "\t-Distance: {:.3}", self.best_distance)?;
        writeln!(f, "Average distance: {:.3}", self.average_distance)?;
        writeln!(f, "Initial average: {:.3}", self.initial_average_distance)?;
        write!(f, "Time: {:.4}s", self.computation_time)
    }
}

/// Advance `ga` until `termination` fires.
pub fn run<R: RandomSource>(ga: &mut GeneticAlgorithm<R>, termination: &Termination) -> RunReport {
    run_with_observer(ga, termination, |_, _| {})
}

/// Like [`run`], calling `observer` after every generation.
pub fn run_with_observer<R, F>(
    ga: &mut GeneticAlgorithm<R>,
    termination: &Termination,
    mut observer: F,
) -> RunReport
where
    R: RandomSource,
    F: FnMut(&GeneticAlgorithm<R>, &Progress),
{
    let start = Instant::now();
    let initial_average_distance = ga.average_tour_distance();
    let mut progress = Progress::default();

    while !termination.should_stop(&progress) {
        ga.advance_one_generation();

        if progress.record(ga.best_fitness()) {
            log::debug!(
                "[GA] Gen {}  Best distance {:.3}  Average {:.3}",
                ga.generation(),
                ga.best_tour_distance(),
                ga.average_tour_distance()
            );
        }
        observer(ga, &progress);
    }

    let report = RunReport {
        seed: ga.config().seed,
        cities: ga.instance().dimension(),
        population_size: ga.population().size(),
        generations: progress.generations,
        generations_without_improvement: progress.without_improvement,
        best_tour: ga.best_tour().to_vec(),
        best_fitness: ga.best_fitness(),
        best_distance: ga.best_tour_distance(),
        average_distance: ga.average_tour_distance(),
        initial_average_distance,
        immigrant_fills: ga.immigrant_fills(),
        computation_time: start.elapsed().as_secs_f64(),
    };

    log::info!(
        "[GA] Finished after {} generations: best distance {:.3} (initial average {:.3})",
        report.generations,
        report.best_distance,
        report.initial_average_distance
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_requires_a_rule() {
        assert!(matches!(Termination::new(None, None), Err(ConfigError::NoStoppingRule)));
        assert!(Termination::new(Some(10), None).is_ok());
    }

    #[test]
    fn test_progress_counts_stagnation() {
        let mut progress = Progress::default();
        assert!(progress.record(0.1));
        assert!(!progress.record(0.1));
        assert!(!progress.record(0.05));
        assert_eq!(progress.without_improvement, 2);
        assert!(progress.record(0.2));
        assert_eq!(progress.without_improvement, 0);
        assert_eq!(progress.generations, 4);
    }

    #[test]
    fn test_generation_cap() {
        let config = GAConfig {
            city_count: 10,
            population_size: 10,
            ..Default::default()
        };
        let mut ga = GeneticAlgorithm::new(config).unwrap();
        let termination = Termination::new(Some(25), None).unwrap();

        let report = run(&mut ga, &termination);
        assert_eq!(report.generations, 25);
        assert_eq!(ga.generation(), 25);
        assert_eq!(report.best_tour.len(), 10);
    }

    #[test]
    fn test_stagnation_cap() {
        let config = GAConfig {
            city_count: 6,
            population_size: 8,
            ..Default::default()
        };
        let mut ga = GeneticAlgorithm::new(config).unwrap();
        let termination = Termination::new(None, Some(50)).unwrap();

        let report = run(&mut ga, &termination);
        assert_eq!(report.generations_without_improvement, 50);
        assert!(report.generations >= 50);
    }

    #[test]
    fn test_observer_sees_every_generation() {
        let config = GAConfig {
            city_count: 8,
            population_size: 6,
            ..Default::default()
        };
        let mut ga = GeneticAlgorithm::new(config).unwrap();
        let termination = Termination::new(Some(15), Some(1000)).unwrap();

        let mut seen = Vec::new();
        run_with_observer(&mut ga, &termination, |ga, progress| {
            seen.push((ga.generation(), progress.best_fitness));
        });

        assert_eq!(seen.len(), 15);
        assert!(seen.windows(2).all(|w| w[1].1 >= w[0].1));
        assert_eq!(seen.last().map(|s| s.0), Some(15));
    }
}
