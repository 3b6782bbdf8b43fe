//! Module for building and representing Euclidean TSP instances.
//!
//! An instance is a fixed, read-only set of cities. It can be generated from a
//! seeded random source inside coordinate bounds or parsed from a TSP-LIB
//! `EUC_2D` file. Pairwise distances are precomputed once at construction.

use crate::error::InstanceError;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A city position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(x: f64, y: f64) -> Self {
        City { x, y }
    }

    /// Euclidean distance to another city
    #[inline]
    pub fn distance_to(&self, other: &City) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Closed coordinate interval `[min, max]` for one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f64 {
        self.min + rng.uniform_inclusive(self.max - self.min)
    }
}

/// A complete TSP instance
#[derive(Debug, Clone, Serialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// City coordinates, indexed by city id
    cities: Vec<City>,
    /// Precomputed distance matrix
    #[serde(skip)]
    distance_matrix: Vec<Vec<f64>>,
}

impl TspInstance {
    /// Build an instance from explicit coordinates
    pub fn from_cities(name: &str, cities: Vec<City>) -> Result<Self, InstanceError> {
        if cities.len() < 2 {
            return Err(InstanceError::TooFewCities(cities.len()));
        }

        let distance_matrix = Self::compute_distance_matrix(&cities);

        Ok(TspInstance {
            name: name.to_string(),
            comment: String::new(),
            cities,
            distance_matrix,
        })
    }

    /// Draw `city_count` cities uniformly from `x_bounds × y_bounds`.
    ///
    /// For every city the x coordinate is drawn before the y coordinate.
    pub fn random<R: RandomSource + ?Sized>(
        city_count: usize,
        x_bounds: Bounds,
        y_bounds: Bounds,
        rng: &mut R,
    ) -> Result<Self, InstanceError> {
        if city_count < 2 {
            return Err(InstanceError::TooFewCities(city_count));
        }

        let cities = (0..city_count)
            .map(|_| {
                let x = x_bounds.sample(rng);
                let y = y_bounds.sample(rng);
                City::new(x, y)
            })
            .collect();

        let mut instance = Self::from_cities("random", cities)?;
        instance.comment = format!(
            "{} cities in [{}, {}] x [{}, {}]",
            city_count, x_bounds.min, x_bounds.max, y_bounds.min, y_bounds.max
        );
        Ok(instance)
    }

    /// Parse a TSP-LIB `EUC_2D` instance file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InstanceError> {
        let file = File::open(&path)?;
        let reader = BufReader::new(file);

        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension: Option<usize> = None;
        let mut coords: Vec<(usize, f64, f64)> = Vec::new();
        let mut in_coords = false;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line == "EOF" {
                continue;
            }

            let parse_err = |message: &str| InstanceError::Parse {
                line: line_no,
                message: message.to_string(),
            };

            if let Some(rest) = line.strip_prefix("NAME") {
                name = rest.trim_start_matches(&[' ', ':'][..]).trim().to_string();
                continue;
            }
            if let Some(rest) = line.strip_prefix("COMMENT") {
                comment = rest.trim_start_matches(&[' ', ':'][..]).trim().to_string();
                continue;
            }
            if let Some(rest) = line.strip_prefix("DIMENSION") {
                let value = rest.trim_start_matches(&[' ', ':'][..]).trim();
                dimension = Some(value.parse().map_err(|_| parse_err("Invalid dimension"))?);
                continue;
            }
            if let Some(rest) = line.strip_prefix("EDGE_WEIGHT_TYPE") {
                let value = rest.trim_start_matches(&[' ', ':'][..]).trim();
                if value != "EUC_2D" {
                    return Err(parse_err("Only EUC_2D edge weights are supported"));
                }
                continue;
            }
            if line.starts_with("TYPE") {
                continue;
            }
            if line.starts_with("NODE_COORD_SECTION") {
                in_coords = true;
                continue;
            }
            if line.ends_with("_SECTION") {
                in_coords = false;
                continue;
            }

            if in_coords {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 3 {
                    return Err(parse_err("Expected `id x y`"));
                }
                let id: usize = parts[0].parse().map_err(|_| parse_err("Invalid node id"))?;
                let x: f64 = parts[1].parse().map_err(|_| parse_err("Invalid x coordinate"))?;
                let y: f64 = parts[2].parse().map_err(|_| parse_err("Invalid y coordinate"))?;
                coords.push((id, x, y));
            }
        }

        if let Some(declared) = dimension {
            if declared != coords.len() {
                return Err(InstanceError::DimensionMismatch {
                    declared,
                    found: coords.len(),
                });
            }
        }

        // File ids are 1-based and may be listed out of order
        coords.sort_by_key(|(id, _, _)| *id);
        let cities = coords.into_iter().map(|(_, x, y)| City::new(x, y)).collect();

        let mut instance = Self::from_cities(&name, cities)?;
        instance.comment = comment;
        Ok(instance)
    }

    /// Compute Euclidean distance matrix
    fn compute_distance_matrix(cities: &[City]) -> Vec<Vec<f64>> {
        let n = cities.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = cities[i].distance_to(&cities[j]);
                }
            }
        }

        matrix
    }

    /// Number of cities
    #[inline]
    pub fn dimension(&self) -> usize {
        self.cities.len()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    #[inline]
    pub fn city(&self, i: usize) -> City {
        self.cities[i]
    }

    /// Get the distance between two cities
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Length of the closed tour, including the edge from the last city back
    /// to the first.
    pub fn total_distance(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }

        let open: f64 = tour.windows(2).map(|w| self.distance(w[0], w[1])).sum();
        open + self.distance(tour[tour.len() - 1], tour[0])
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for city in &self.cities {
            min_x = min_x.min(city.x);
            max_x = max_x.max(city.x);
            min_y = min_y.min(city.y);
            max_y = max_y.max(city.y);
        }

        let n = self.dimension();
        let mut distances: Vec<f64> = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                distances.push(self.distance(i, j));
            }
        }
        let avg_distance = distances.iter().sum::<f64>() / distances.len() as f64;
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            min_x,
            max_x,
            min_y,
            max_y,
            avg_distance,
            max_distance,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Cities: {}", self.dimension)?;
        writeln!(f, "  X range: [{:.2}, {:.2}]", self.min_x, self.max_x)?;
        writeln!(f, "  Y range: [{:.2}, {:.2}]", self.min_y, self.max_y)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;
    use std::io::Write;

    fn square() -> TspInstance {
        TspInstance::from_cities(
            "square",
            vec![
                City::new(0.0, 0.0),
                City::new(1.0, 0.0),
                City::new(1.0, 1.0),
                City::new(0.0, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_distance_calculation() {
        let cities = vec![City::new(0.0, 0.0), City::new(3.0, 4.0)];
        let matrix = TspInstance::compute_distance_matrix(&cities);

        assert!((matrix[0][1] - 5.0).abs() < 1e-10);
        assert!((matrix[1][0] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_total_distance_closes_the_tour() {
        let instance = square();
        assert!((instance.total_distance(&[0, 1, 2, 3]) - 4.0).abs() < 1e-10);
        let diagonal = 2.0 + 2.0 * 2f64.sqrt();
        assert!((instance.total_distance(&[0, 2, 1, 3]) - diagonal).abs() < 1e-10);
    }

    #[test]
    fn test_too_few_cities_rejected() {
        let mut rng = SeededRandom::new(1);
        let bounds = Bounds::new(0.0, 10.0);
        assert!(matches!(
            TspInstance::random(1, bounds, bounds, &mut rng),
            Err(InstanceError::TooFewCities(1))
        ));
        assert!(TspInstance::from_cities("one", vec![City::new(0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_random_cities_within_bounds() {
        let mut rng = SeededRandom::new(17);
        let instance = TspInstance::random(
            200,
            Bounds::new(0.0, 1000.0),
            Bounds::new(-50.0, 500.0),
            &mut rng,
        )
        .unwrap();

        assert_eq!(instance.dimension(), 200);
        for city in instance.cities() {
            assert!((0.0..=1000.0).contains(&city.x));
            assert!((-50.0..=500.0).contains(&city.y));
        }
    }

    #[test]
    fn test_random_instance_is_reproducible() {
        let bounds = Bounds::new(0.0, 100.0);
        let a = TspInstance::random(20, bounds, bounds, &mut SeededRandom::new(5)).unwrap();
        let b = TspInstance::random(20, bounds, bounds, &mut SeededRandom::new(5)).unwrap();
        assert_eq!(a.cities(), b.cities());
    }

    #[test]
    fn test_parse_tsplib_file() {
        let path = std::env::temp_dir().join("tsp_ga_solver_parse_test.tsp");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "NAME: tiny").unwrap();
            writeln!(file, "COMMENT: three cities").unwrap();
            writeln!(file, "TYPE: TSP").unwrap();
            writeln!(file, "DIMENSION: 3").unwrap();
            writeln!(file, "EDGE_WEIGHT_TYPE: EUC_2D").unwrap();
            writeln!(file, "NODE_COORD_SECTION").unwrap();
            writeln!(file, "2 3.0 4.0").unwrap();
            writeln!(file, "1 0.0 0.0").unwrap();
            writeln!(file, "3 3.0 0.0").unwrap();
            writeln!(file, "EOF").unwrap();
        }

        let instance = TspInstance::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(instance.name, "tiny");
        assert_eq!(instance.comment, "three cities");
        assert_eq!(instance.dimension(), 3);
        assert_eq!(instance.city(0), City::new(0.0, 0.0));
        assert!((instance.distance(0, 1) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_parse_dimension_mismatch() {
        let path = std::env::temp_dir().join("tsp_ga_solver_mismatch_test.tsp");
        std::fs::write(&path, "DIMENSION: 4\nNODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n").unwrap();

        let result = TspInstance::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            result,
            Err(InstanceError::DimensionMismatch { declared: 4, found: 2 })
        ));
    }

    #[test]
    fn test_statistics() {
        let stats = square().statistics();
        assert_eq!(stats.dimension, 4);
        assert_eq!(stats.max_x, 1.0);
        assert!((stats.max_distance - 2f64.sqrt()).abs() < 1e-10);
    }
}
