//! Chromosome and population storage.
//!
//! A [`Chromosome`] is a permutation of the city indices `0..n` and is the
//! only tour representation used by the solver. The [`Population`] owns two
//! buffers of chromosomes: the current generation, and the next generation
//! under construction. Buffers are swapped by reference at the end of every
//! generation.

use crate::rng::RandomSource;
use serde::Serialize;
use std::fmt;

/// A candidate tour: every city index appears exactly once
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Chromosome {
    genes: Vec<usize>,
}

impl Chromosome {
    /// Wrap a gene sequence, returning `None` if it is not a permutation of
    /// `0..genes.len()`.
    pub fn from_genes(genes: Vec<usize>) -> Option<Self> {
        if is_permutation(&genes) {
            Some(Chromosome { genes })
        } else {
            None
        }
    }

    /// Genes that are already known to form a permutation.
    pub(crate) fn from_genes_unchecked(genes: Vec<usize>) -> Self {
        debug_assert!(is_permutation(&genes), "chromosome is not a permutation: {:?}", genes);
        Chromosome { genes }
    }

    /// The tour `0, 1, ..., n - 1`
    pub fn identity(n: usize) -> Self {
        Chromosome {
            genes: (0..n).collect(),
        }
    }

    /// Uniformly random tour, shuffled with Fisher-Yates
    pub fn random<R: RandomSource + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut genes: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = rng.index_through(i);
            genes.swap(i, j);
        }
        Chromosome { genes }
    }

    #[inline]
    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Exchange the genes at two positions
    pub fn swap(&mut self, i: usize, j: usize) {
        self.genes.swap(i, j);
    }

    pub fn is_valid(&self) -> bool {
        is_permutation(&self.genes)
    }

    /// Advance to the lexicographically next permutation, wrapping from the
    /// last permutation back to the identity.
    pub fn next_permutation(&mut self) {
        let genes = &mut self.genes;
        let n = genes.len();
        if n < 2 {
            return;
        }

        let mut i = n - 1;
        while i > 0 && genes[i - 1] >= genes[i] {
            i -= 1;
        }
        if i == 0 {
            genes.reverse();
            return;
        }

        let mut j = n - 1;
        while genes[j] <= genes[i - 1] {
            j -= 1;
        }
        genes.swap(i - 1, j);
        genes[i..].reverse();
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, gene) in self.genes.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", gene)?;
        }
        Ok(())
    }
}

/// True if `genes` holds every index in `0..genes.len()` exactly once
pub fn is_permutation(genes: &[usize]) -> bool {
    let mut seen = vec![false; genes.len()];
    for &gene in genes {
        if gene >= genes.len() || seen[gene] {
            return false;
        }
        seen[gene] = true;
    }
    true
}

/// Current and next generation buffers of a fixed size
#[derive(Debug, Clone)]
pub struct Population {
    size: usize,
    current: Vec<Chromosome>,
    next: Vec<Chromosome>,
}

impl Population {
    /// `size` uniformly random tours over `city_count` cities
    pub fn random<R: RandomSource + ?Sized>(size: usize, city_count: usize, rng: &mut R) -> Self {
        let current = (0..size).map(|_| Chromosome::random(city_count, rng)).collect();
        Population {
            size,
            current,
            next: Vec::with_capacity(size),
        }
    }

    /// Build from existing chromosomes; the population size is their count.
    pub fn from_chromosomes(chromosomes: Vec<Chromosome>) -> Self {
        let size = chromosomes.len();
        Population {
            size,
            current: chromosomes,
            next: Vec::with_capacity(size),
        }
    }

    /// Target number of chromosomes per generation
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The current generation
    #[inline]
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.current
    }

    #[inline]
    pub fn get(&self, index: usize) -> &Chromosome {
        &self.current[index]
    }

    /// Chromosomes placed in the next generation so far
    pub fn next_generation(&self) -> &[Chromosome] {
        &self.next
    }

    pub fn next_len(&self) -> usize {
        self.next.len()
    }

    pub fn is_next_full(&self) -> bool {
        self.next.len() >= self.size
    }

    /// True if the next generation already holds an identical tour
    pub fn next_contains(&self, chromosome: &Chromosome) -> bool {
        self.next.iter().any(|c| c == chromosome)
    }

    /// Copy a chromosome of the current generation into the next one
    /// unchanged. Used for elitism; no duplicate check.
    pub fn carry_over(&mut self, index: usize) {
        debug_assert!(!self.is_next_full(), "next generation overflow");
        let chromosome = self.current[index].clone();
        self.next.push(chromosome);
    }

    /// Add `chromosome` to the next generation unless it is full or already
    /// holds an identical tour. Returns whether it was inserted.
    pub fn try_insert(&mut self, chromosome: Chromosome) -> bool {
        if self.is_next_full() || self.next_contains(&chromosome) {
            return false;
        }
        self.next.push(chromosome);
        true
    }

    /// Replace the current generation with the completed next one.
    pub fn swap_generations(&mut self) {
        debug_assert_eq!(self.next.len(), self.size, "next generation is incomplete");
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
    }
}
