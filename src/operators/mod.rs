//! Genetic operators: selection, crossover and mutation.

pub mod selection;
pub mod crossover;
pub mod mutation;

pub use selection::*;
pub use crossover::*;
pub use mutation::*;
