//! Random source used by every stochastic step of the solver.
//!
//! Draws are a 32-bit integer scaled onto the requested range. The inclusive
//! and exclusive variants differ only in the divisor, which keeps the upper
//! bound reachable for `uniform_inclusive` and unreachable for
//! `uniform_exclusive`. Index arithmetic in the operators depends on that.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Number of redraws attempted before a distinct pair falls back to a draw
/// without replacement.
pub const MAX_DISTINCT_RETRIES: usize = 16;

/// Integer range for index draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRange {
    /// `0..n`
    Below(usize),
    /// `0..=n`
    Through(usize),
}

impl IndexRange {
    /// Number of distinct values in the range.
    pub fn len(self) -> usize {
        match self {
            IndexRange::Below(n) => n,
            IndexRange::Through(n) => n + 1,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

#[inline]
pub(crate) fn scale_inclusive(raw: u32, max: f64) -> f64 {
    (raw as f64 * max) / u32::MAX as f64
}

#[inline]
pub(crate) fn scale_exclusive(raw: u32, max: f64) -> f64 {
    (raw as f64 * max) / (u32::MAX as f64 + 1.0)
}

/// Source of uniform draws for the genetic algorithm.
///
/// Implementors only provide the raw 32-bit stream and re-seeding; the
/// range helpers are shared so every implementation (including scripted
/// test sources) honours the same inclusive/exclusive contract.
pub trait RandomSource {
    /// Next raw 32-bit draw.
    fn next_raw(&mut self) -> u32;

    /// Restart the stream from `seed`.
    fn reseed(&mut self, seed: u64);

    /// Uniform value in `[0, max]`.
    fn uniform_inclusive(&mut self, max: f64) -> f64 {
        scale_inclusive(self.next_raw(), max)
    }

    /// Uniform value in `[0, max)`.
    fn uniform_exclusive(&mut self, max: f64) -> f64 {
        scale_exclusive(self.next_raw(), max)
    }

    /// Uniform index in `0..n`. `n` must be positive.
    fn index_below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "cannot draw an index from an empty range");
        let index = self.uniform_exclusive(n as f64) as usize;
        debug_assert!(index < n);
        index.min(n.saturating_sub(1))
    }

    /// Uniform index in `0..=n`.
    fn index_through(&mut self, n: usize) -> usize {
        (self.uniform_inclusive(n as f64) as usize).min(n)
    }

    fn draw_index(&mut self, range: IndexRange) -> usize {
        match range {
            IndexRange::Below(n) => self.index_below(n),
            IndexRange::Through(n) => self.index_through(n),
        }
    }

    /// Two distinct indices from `range`, in draw order.
    ///
    /// The second index is redrawn up to [`MAX_DISTINCT_RETRIES`] times; after
    /// that it is drawn without replacement from the values other than the
    /// first, so the call always terminates.
    fn distinct_pair(&mut self, range: IndexRange) -> (usize, usize) {
        let len = range.len();
        debug_assert!(len >= 2, "a distinct pair needs at least two values");

        let first = self.draw_index(range);
        for _ in 0..MAX_DISTINCT_RETRIES {
            let second = self.draw_index(range);
            if second != first {
                return (first, second);
            }
        }

        let offset = self.index_below(len - 1);
        let second = if offset >= first { offset + 1 } else { offset };
        (first, second)
    }
}

/// Deterministic random source backed by ChaCha8.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed the stream was last started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_raw(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.seed = seed;
    }
}
