//! Swap mutation.

use crate::population::Chromosome;
use crate::rng::{IndexRange, RandomSource};

/// With probability `mutation_prob`, swap the genes at two distinct random
/// positions. Returns whether the chromosome changed.
pub fn swap_mutation<R: RandomSource + ?Sized>(
    chromosome: &mut Chromosome,
    mutation_prob: f64,
    rng: &mut R,
) -> bool {
    if rng.uniform_exclusive(1.0) >= mutation_prob || chromosome.len() < 2 {
        return false;
    }

    let (i, j) = rng.distinct_pair(IndexRange::Below(chromosome.len()));
    chromosome.swap(i, j);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    #[test]
    fn test_zero_probability_never_mutates() {
        let mut rng = SeededRandom::new(17);
        let original = Chromosome::random(20, &mut rng);
        let mut chromosome = original.clone();
        for _ in 0..1000 {
            assert!(!swap_mutation(&mut chromosome, 0.0, &mut rng));
        }
        assert_eq!(chromosome, original);
    }

    #[test]
    fn test_mutation_swaps_exactly_two_genes() {
        let mut rng = SeededRandom::new(4);
        for _ in 0..200 {
            let original = Chromosome::random(15, &mut rng);
            let mut chromosome = original.clone();
            assert!(swap_mutation(&mut chromosome, 1.0, &mut rng));
            assert!(chromosome.is_valid());

            let changed = original
                .genes()
                .iter()
                .zip(chromosome.genes())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(changed, 2);
        }
    }

    #[test]
    fn test_two_city_tour_mutates() {
        let mut rng = SeededRandom::new(8);
        let mut chromosome = Chromosome::identity(2);
        swap_mutation(&mut chromosome, 1.0, &mut rng);
        assert_eq!(chromosome.genes(), &[1, 0]);
    }
}
