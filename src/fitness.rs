//! Fitness evaluation.
//!
//! Fitness is the reciprocal of the closed tour length, so shorter tours score
//! higher. [`Scores`] holds the distances and fitness values of one population
//! snapshot; it has to be rebuilt whenever the population changes.

use crate::instance::TspInstance;
use crate::population::Chromosome;
use ordered_float::OrderedFloat;

/// Tour lengths below this are treated as this length, which bounds fitness
/// at `1e12` when every city sits on the same point.
pub const MIN_TOUR_DISTANCE: f64 = 1e-12;

/// Fitness of a tour of the given length
#[inline]
pub fn fitness(distance: f64) -> f64 {
    1.0 / distance.max(MIN_TOUR_DISTANCE)
}

/// Fitness of a chromosome on an instance
pub fn evaluate(instance: &TspInstance, chromosome: &Chromosome) -> f64 {
    fitness(instance.total_distance(chromosome.genes()))
}

/// Distances and fitness values for one population snapshot
#[derive(Debug, Clone)]
pub struct Scores {
    distances: Vec<f64>,
    fitness: Vec<f64>,
}

impl Scores {
    pub fn evaluate(instance: &TspInstance, chromosomes: &[Chromosome]) -> Self {
        let distances: Vec<f64> = chromosomes
            .iter()
            .map(|c| instance.total_distance(c.genes()))
            .collect();
        let fitness = distances.iter().map(|&d| fitness(d)).collect();

        Scores { distances, fitness }
    }

    pub fn len(&self) -> usize {
        self.fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fitness.is_empty()
    }

    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Index of the fittest chromosome; the first one wins ties.
    pub fn best(&self) -> usize {
        self.best_excluding(None)
    }

    /// Index of the fittest chromosome other than `excluded`; the first one
    /// wins ties.
    pub fn runner_up(&self, excluded: usize) -> usize {
        self.best_excluding(Some(excluded))
    }

    fn best_excluding(&self, excluded: Option<usize>) -> usize {
        self.fitness
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != excluded)
            .min_by_key(|(_, &f)| std::cmp::Reverse(OrderedFloat(f)))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    pub fn average_distance(&self) -> f64 {
        if self.distances.is_empty() {
            return 0.0;
        }
        self.distances.iter().sum::<f64>() / self.distances.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::City;

    fn line_instance() -> TspInstance {
        TspInstance::from_cities(
            "line",
            vec![
                City::new(0.0, 0.0),
                City::new(1.0, 0.0),
                City::new(2.0, 0.0),
                City::new(3.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fitness_is_reciprocal_distance() {
        assert!((fitness(4.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_zero_distance_is_finite() {
        let f = fitness(0.0);
        assert!(f.is_finite());
        assert!(f > 0.0);

        let instance = TspInstance::from_cities(
            "stacked",
            vec![City::new(5.0, 5.0), City::new(5.0, 5.0), City::new(5.0, 5.0)],
        )
        .unwrap();
        let score = evaluate(&instance, &Chromosome::identity(3));
        assert_eq!(score, 1.0 / MIN_TOUR_DISTANCE);
    }

    #[test]
    fn test_best_and_runner_up() {
        let instance = line_instance();
        let chromosomes = vec![
            Chromosome::from_genes(vec![0, 2, 1, 3]).unwrap(),
            Chromosome::identity(4),
            Chromosome::from_genes(vec![2, 0, 3, 1]).unwrap(),
            Chromosome::from_genes(vec![3, 2, 1, 0]).unwrap(),
        ];
        let scores = Scores::evaluate(&instance, &chromosomes);

        // identity and its reversal both have length 6; the first one wins
        assert_eq!(scores.best(), 1);
        assert_eq!(scores.runner_up(1), 3);
        assert!((scores.distances()[1] - 6.0).abs() < 1e-12);
        assert_eq!(scores.len(), 4);
    }

    #[test]
    fn test_average_distance() {
        let instance = line_instance();
        let chromosomes = vec![
            Chromosome::identity(4),
            Chromosome::from_genes(vec![0, 2, 1, 3]).unwrap(),
        ];
        let scores = Scores::evaluate(&instance, &chromosomes);
        // 6 and 2 + 1 + 2 + 3 = 8
        assert!((scores.average_distance() - 7.0).abs() < 1e-12);
    }
}
