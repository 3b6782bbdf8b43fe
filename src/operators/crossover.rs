//! Multi-point crossover with duplicate repair.
//!
//! Each offspring starts as a copy of its own parent with the segment
//! `[start, end)` taken from the other parent. Genes outside the segment that
//! now collide with the segment are cleared, and every hole is refilled from
//! the sibling offspring: scanning the sibling from position 0, the first gene
//! the offspring does not hold yet goes into the hole. Holes are filled in
//! ascending position order, alternating offspring A then offspring B at each
//! position, so results are reproducible under a fixed seed.

use crate::population::{is_permutation, Chromosome};
use crate::rng::{IndexRange, RandomSource};

/// Recombine two parents.
///
/// Crossover happens with probability `crossover_prob`; otherwise the
/// offspring are copies of the parents. Both offspring are always valid
/// permutations.
pub fn multi_point_crossover<R: RandomSource + ?Sized>(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    crossover_prob: f64,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    debug_assert_eq!(parent_a.len(), parent_b.len());

    if rng.uniform_exclusive(1.0) >= crossover_prob {
        return (parent_a.clone(), parent_b.clone());
    }

    let n = parent_a.len();
    let (cut1, cut2) = rng.distinct_pair(IndexRange::Through(n));
    let (start, end) = if cut1 < cut2 { (cut1, cut2) } else { (cut2, cut1) };

    recombine(parent_a, parent_b, start, end)
}

/// Exchange `[start, end)` between the parents and repair both offspring.
pub fn recombine(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    start: usize,
    end: usize,
) -> (Chromosome, Chromosome) {
    let n = parent_a.len();
    debug_assert!(start <= end && end <= n);

    let mut offspring_a: Vec<Option<usize>> = parent_a.genes().iter().map(|&g| Some(g)).collect();
    let mut offspring_b: Vec<Option<usize>> = parent_b.genes().iter().map(|&g| Some(g)).collect();

    offspring_a[start..end].copy_from_slice(&segment_of(parent_b, start, end));
    offspring_b[start..end].copy_from_slice(&segment_of(parent_a, start, end));

    mark_collisions(&mut offspring_a, start, end);
    mark_collisions(&mut offspring_b, start, end);

    for pos in 0..n {
        if offspring_a[pos].is_none() {
            offspring_a[pos] = first_missing(&offspring_a, &offspring_b);
        }
        if offspring_b[pos].is_none() {
            offspring_b[pos] = first_missing(&offspring_b, &offspring_a);
        }
    }

    match (finish(offspring_a), finish(offspring_b)) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            debug_assert!(false, "crossover repair left an invalid offspring");
            (parent_a.clone(), parent_b.clone())
        }
    }
}

fn segment_of(donor: &Chromosome, start: usize, end: usize) -> Vec<Option<usize>> {
    donor.genes()[start..end].iter().map(|&g| Some(g)).collect()
}

/// Clear genes outside `[start, end)` that also occur inside it.
fn mark_collisions(offspring: &mut [Option<usize>], start: usize, end: usize) {
    let n = offspring.len();
    let mut in_segment = vec![false; n];
    for gene in offspring[start..end].iter().flatten() {
        in_segment[*gene] = true;
    }

    for (pos, slot) in offspring.iter_mut().enumerate() {
        if (start..end).contains(&pos) {
            continue;
        }
        if let Some(gene) = *slot {
            if in_segment[gene] {
                *slot = None;
            }
        }
    }
}

/// First gene of `donor`, in position order, that `target` does not hold.
fn first_missing(target: &[Option<usize>], donor: &[Option<usize>]) -> Option<usize> {
    donor
        .iter()
        .flatten()
        .copied()
        .find(|gene| !target.contains(&Some(*gene)))
}

fn finish(genes: Vec<Option<usize>>) -> Option<Chromosome> {
    let genes: Vec<usize> = genes.into_iter().collect::<Option<Vec<_>>>()?;
    if is_permutation(&genes) {
        Some(Chromosome::from_genes_unchecked(genes))
    } else {
        None
    }
}
