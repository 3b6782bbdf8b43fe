//! TSP Genetic Algorithm Solver Library
//!
//! A genetic algorithm for the Euclidean Traveling Salesman Problem.
//!
//! # Features
//!
//! - Random instances from a seeded generator, or TSP-LIB `EUC_2D` files
//! - Roulette wheel selection, multi-point crossover with repair, swap mutation
//! - Elitism and duplicate-free generations
//! - Stopping on a generation cap or after a run of generations without improvement
//! - Multi-seed benchmarking and SVG visualization
//!
//! # Example
//!
//! ```no_run
//! use tsp_ga_solver::config::GAConfig;
//! use tsp_ga_solver::driver::{run, Termination};
//! use tsp_ga_solver::genetic::GeneticAlgorithm;
//!
//! let config = GAConfig::default();
//! let termination = Termination::from_config(&config).unwrap();
//! let mut ga = GeneticAlgorithm::new(config).unwrap();
//!
//! let report = run(&mut ga, &termination);
//! println!("Best distance: {:.2}", report.best_distance);
//! ```

pub mod error;
pub mod rng;
pub mod instance;
pub mod population;
pub mod fitness;
pub mod operators;
pub mod config;
pub mod genetic;
pub mod driver;
pub mod benchmark;
pub mod visualization;

pub use config::GAConfig;
pub use error::{ConfigError, InstanceError};
pub use genetic::GeneticAlgorithm;
pub use instance::TspInstance;
pub use population::Chromosome;
pub use rng::{RandomSource, SeededRandom};
