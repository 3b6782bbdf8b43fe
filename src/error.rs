//! Error types for instance loading and solver configuration.

/// Errors raised while building or loading a TSP instance.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("Cannot read instance: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("A tour needs at least 2 cities, got {0}")]
    TooFewCities(usize),
    #[error("DIMENSION declares {declared} cities but {found} coordinates were read")]
    DimensionMismatch { declared: usize, found: usize },
}

/// Errors raised when a solver configuration is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("A tour needs at least 2 cities, got {0}")]
    TooFewCities(usize),
    #[error("Population size must be at least 3 (2 elites + 1 bred slot), got {0}")]
    PopulationTooSmall(usize),
    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("Invalid {axis} bounds: [{min}, {max}]")]
    InvalidBounds { axis: &'static str, min: f64, max: f64 },
    #[error("Population size {population} exceeds the {permutations} distinct tours of {cities} cities")]
    PopulationExceedsPermutations {
        population: usize,
        cities: usize,
        permutations: u128,
    },
    #[error("At least one stopping rule (max generations or max generations without improvement) is required")]
    NoStoppingRule,
    #[error("Instance error: {0}")]
    Instance(#[from] InstanceError),
    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
}
