//! Roulette wheel parent selection.

use crate::rng::RandomSource;

/// Redraws of parent B before it is drawn uniformly among the other slots.
pub const MAX_PARENT_RETRIES: usize = 64;

/// Pick an index with probability proportional to its fitness.
///
/// Draws `r` in `[0, S]` where `S` is the total fitness and returns the first
/// index whose running sum reaches `r`. If rounding leaves the running sum
/// just short of `r`, the last index is returned.
pub fn roulette_select<R: RandomSource + ?Sized>(fitness: &[f64], rng: &mut R) -> usize {
    debug_assert!(!fitness.is_empty(), "cannot select from an empty population");

    let total: f64 = fitness.iter().sum();
    let pick = rng.uniform_inclusive(total);

    let mut sum = 0.0;
    for (i, &f) in fitness.iter().enumerate() {
        sum += f;
        if sum >= pick {
            return i;
        }
    }

    debug_assert!(
        pick - sum <= total * 1e-9,
        "roulette wheel missed by more than rounding: pick={} sum={}",
        pick,
        sum
    );
    fitness.len() - 1
}

/// Select two parents from different population slots.
///
/// Parent B is redrawn by roulette while it lands on parent A's slot. After
/// [`MAX_PARENT_RETRIES`] misses it is drawn uniformly among the remaining
/// slots, which only happens when one chromosome dominates the wheel.
pub fn select_parents<R: RandomSource + ?Sized>(fitness: &[f64], rng: &mut R) -> (usize, usize) {
    debug_assert!(fitness.len() >= 2, "two parents need at least two chromosomes");

    let parent_a = roulette_select(fitness, rng);
    for _ in 0..MAX_PARENT_RETRIES {
        let parent_b = roulette_select(fitness, rng);
        if parent_b != parent_a {
            return (parent_a, parent_b);
        }
    }

    let offset = rng.index_below(fitness.len() - 1);
    let parent_b = if offset >= parent_a { offset + 1 } else { offset };
    (parent_a, parent_b)
}
