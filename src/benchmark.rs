//! Benchmarking module.
//!
//! Runs the genetic algorithm over a range of seeds, collects one record per
//! run, and exports the records and their aggregate statistics.

use crate::config::GAConfig;
use crate::driver::{run, Termination};
use crate::error::ConfigError;
use crate::genetic::GeneticAlgorithm;
use crate::instance::TspInstance;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Result of a single seeded run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Seed used for the instance (when generated) and the search
    pub seed: u64,
    /// Instance name
    pub instance: String,
    /// Number of cities
    pub cities: usize,
    /// Generations until the run stopped
    pub generations: usize,
    /// Best tour length found
    pub best_distance: f64,
    /// Average tour length of the initial random population
    pub initial_average: f64,
    /// Relative improvement of the best tour over the initial average, in percent
    pub improvement: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Generations that needed fresh tours to fill the population
    pub immigrant_fills: usize,
}

/// Aggregated statistics over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    pub num_runs: usize,
    pub avg_distance: f64,
    pub best_distance: f64,
    pub worst_distance: f64,
    pub std_distance: f64,
    pub avg_generations: f64,
    pub avg_improvement: f64,
    pub avg_time: f64,
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeds to run
    pub num_runs: usize,
    /// Seed of the first run; run `i` uses `first_seed + i`
    pub first_seed: u64,
    /// Solver parameters shared by every run (its seed is replaced)
    pub ga: GAConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            first_seed: 0,
            ga: GAConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run every seed. With `instance` set, all runs share it; otherwise each
    /// seed generates its own random instance.
    pub fn run(&mut self, instance: Option<&TspInstance>) -> Result<(), ConfigError> {
        let termination = Termination::from_config(&self.config.ga)?;

        for i in 0..self.config.num_runs {
            let seed = self.config.first_seed + i as u64;
            let ga_config = GAConfig {
                seed,
                ..self.config.ga.clone()
            };

            let mut ga = match instance {
                Some(instance) => GeneticAlgorithm::with_instance(ga_config, instance.clone())?,
                None => GeneticAlgorithm::new(ga_config)?,
            };

            let report = run(&mut ga, &termination);
            log::info!(
                "[Benchmark] run {}/{} seed {}: best {:.3} after {} generations",
                i + 1,
                self.config.num_runs,
                seed,
                report.best_distance,
                report.generations
            );

            self.results.push(RunResult {
                seed,
                instance: ga.instance().name.clone(),
                cities: report.cities,
                generations: report.generations,
                best_distance: report.best_distance,
                initial_average: report.initial_average_distance,
                improvement: (report.initial_average_distance - report.best_distance)
                    / report.initial_average_distance
                    * 100.0,
                time: report.computation_time,
                immigrant_fills: report.immigrant_fills,
            });
        }

        Ok(())
    }

    /// Aggregate statistics, or `None` before any run
    pub fn compute_statistics(&self) -> Option<BenchmarkStatistics> {
        if self.results.is_empty() {
            return None;
        }

        let n = self.results.len() as f64;
        let distances: Vec<f64> = self.results.iter().map(|r| r.best_distance).collect();

        let avg_distance = distances.iter().sum::<f64>() / n;
        let best_distance = distances.iter().cloned().fold(f64::INFINITY, f64::min);
        let worst_distance = distances.iter().cloned().fold(0.0, f64::max);

        let variance = distances
            .iter()
            .map(|d| (d - avg_distance).powi(2))
            .sum::<f64>()
            / n;

        let total_time = self.results.iter().map(|r| r.time).sum::<f64>();

        Some(BenchmarkStatistics {
            num_runs: self.results.len(),
            avg_distance,
            best_distance,
            worst_distance,
            std_distance: variance.sqrt(),
            avg_generations: self.results.iter().map(|r| r.generations as f64).sum::<f64>() / n,
            avg_improvement: self.results.iter().map(|r| r.improvement).sum::<f64>() / n,
            avg_time: total_time / n,
            total_time,
        })
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        if let Some(stats) = self.compute_statistics() {
            writer.serialize(stats)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("       TSP Genetic Algorithm Benchmark\n");
        report.push_str("========================================\n\n");

        let ga = &self.config.ga;
        report.push_str(&format!(
            "Population: {}  Crossover: {}  Mutation: {}\n\n",
            ga.population_size, ga.crossover_prob, ga.mutation_prob
        ));

        report.push_str(&format!(
            "{:<8} {:>8} {:>12} {:>12} {:>10} {:>10}\n",
            "Seed", "Cities", "Best", "Initial Avg", "Improv%", "Time"
        ));
        report.push_str("-".repeat(65).as_str());
        report.push('\n');

        for result in &self.results {
            report.push_str(&format!(
                "{:<8} {:>8} {:>12.2} {:>12.2} {:>10.2} {:>10.4}\n",
                result.seed,
                result.cities,
                result.best_distance,
                result.initial_average,
                result.improvement,
                result.time
            ));
        }

        report.push_str("-".repeat(65).as_str());
        report.push('\n');

        if let Some(stats) = self.compute_statistics() {
            report.push_str(&format!(
                "\nRuns: {}\nBest distance: {:.2} (avg {:.2}, worst {:.2}, std {:.2})\n",
                stats.num_runs,
                stats.best_distance,
                stats.avg_distance,
                stats.worst_distance,
                stats.std_distance
            ));
            report.push_str(&format!(
                "Avg generations: {:.1}\nAvg improvement: {:.2}%\nTotal time: {:.2}s\n",
                stats.avg_generations, stats.avg_improvement, stats.total_time
            ));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}
