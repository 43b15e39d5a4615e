//! High-performance backend.
//!
//! Grids are bit-packed and evolved 64 cells per word with rows spread over
//! a dedicated rayon pool. Range searches split the seeds into blocks whose
//! lengths are computed in parallel, checking for cancellation between
//! blocks.

use std::sync::Arc;

use rand::RngCore;
use rayon::ThreadPool;
use rayon::prelude::*;

use super::Backend;
use crate::cancel::CancelToken;
use crate::domain::bit_grid::BitGrid;
use crate::domain::sequence::{
    OVERFLOW_THRESHOLD, RangeResult, Sequence, SequenceEngine, Term, positive_seed,
};
use crate::domain::simd_life;
use crate::domain::simulation::{
    Animated, CellView, GridSimulation, Snapshot, checked_coords, sanitize_probability,
};
use crate::error::EngineError;

/// Seeds per block between cancellation checks
const RANGE_BLOCK: u64 = 1 << 16;

/// Grids smaller than this are evolved on the calling thread
const PARALLEL_MIN_ROWS: usize = 64;

/// Bit-packed, double-buffered grid evolved on a rayon pool
pub struct AcceleratedGrid {
    current: BitGrid,
    next: BitGrid,
    generation: u64,
    pool: Arc<ThreadPool>,
}

impl AcceleratedGrid {
    pub fn new(width: usize, height: usize, pool: Arc<ThreadPool>) -> Result<Self, EngineError> {
        let current = BitGrid::new(width, height)?;
        let next = current.clone();
        Ok(Self { current, next, generation: 0, pool })
    }

    /// Backing storage of the current generation
    pub fn cells(&self) -> &BitGrid {
        &self.current
    }
}

impl CellView for AcceleratedGrid {
    fn dimensions(&self) -> (usize, usize) {
        self.current.dimensions()
    }

    fn is_alive(&self, x: usize, y: usize) -> bool {
        self.current.get(x, y)
    }
}

impl Animated for AcceleratedGrid {
    fn tick(&mut self) {
        let (_, height) = self.current.dimensions();
        let (src, dst) = (&self.current, &mut self.next);
        if height >= PARALLEL_MIN_ROWS {
            self.pool.install(|| simd_life::evolve_into_parallel(src, dst));
        } else {
            simd_life::evolve_into(src, dst);
        }
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation += 1;
    }

    fn render(&self) -> Snapshot<'_> {
        Snapshot::new(self)
    }
}

impl GridSimulation for AcceleratedGrid {
    fn backend(&self) -> Backend {
        Backend::HighPerformance
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn set_cell(&mut self, x: i64, y: i64, alive: bool) {
        let (width, height) = self.current.dimensions();
        if let Some((x, y)) = checked_coords(width, height, x, y) {
            self.current.set(x, y, alive);
        }
    }

    fn randomize_with(&mut self, probability: f64, rng: &mut dyn RngCore) {
        self.current.randomize_with(sanitize_probability(probability), rng);
    }

    fn clear(&mut self) {
        self.current.clear();
    }

    fn population(&self) -> usize {
        self.current.count_alive()
    }
}

/// Length from a positive `n`, consuming whole runs of halvings at once
#[inline]
fn fast_length(mut n: u64) -> usize {
    let mut length = 1;
    loop {
        let zeros = n.trailing_zeros();
        n >>= zeros;
        length += zeros as usize;
        if n == 1 {
            return length;
        }
        if n > OVERFLOW_THRESHOLD {
            return length + 1;
        }
        n = 3 * n + 1;
        length += 1;
    }
}

/// Sequence engine running range searches on a rayon pool
pub struct AcceleratedSequence {
    pool: Arc<ThreadPool>,
}

impl AcceleratedSequence {
    pub fn new(pool: Arc<ThreadPool>) -> Self {
        Self { pool }
    }
}

impl SequenceEngine for AcceleratedSequence {
    fn backend(&self) -> Backend {
        Backend::HighPerformance
    }

    fn compute_sequence(&self, seed: i64) -> Sequence {
        let Some(mut n) = positive_seed(seed) else {
            return Sequence::degenerate();
        };

        let mut terms = Vec::with_capacity(fast_length(n));
        terms.push(Term::Value(n));
        loop {
            while n % 2 == 0 {
                n /= 2;
                terms.push(Term::Value(n));
            }
            if n == 1 {
                break;
            }
            if n > OVERFLOW_THRESHOLD {
                terms.push(Term::Overflow);
                break;
            }
            n = 3 * n + 1;
            terms.push(Term::Value(n));
        }
        Sequence::from_terms(terms)
    }

    fn sequence_length(&self, seed: i64) -> usize {
        positive_seed(seed).map_or(1, fast_length)
    }

    fn find_max_in_range_cancellable(
        &self,
        limit: u64,
        cancel: &CancelToken,
    ) -> Result<RangeResult, EngineError> {
        let mut best = RangeResult::EMPTY;
        let mut start = 1u64;

        while start <= limit {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            let end = start.saturating_add(RANGE_BLOCK - 1).min(limit);
            let block_best = self.pool.install(|| {
                (start..=end)
                    .into_par_iter()
                    .map(|n| RangeResult { number: n, length: fast_length(n) })
                    .reduce(|| RangeResult::EMPTY, RangeResult::better)
            });
            best = best.better(block_best);

            if end == limit {
                break;
            }
            start = end + 1;
        }
        Ok(best)
    }

    fn compute_many(&self, seeds: &[i64]) -> Vec<Sequence> {
        self.pool
            .install(|| seeds.par_iter().map(|&seed| self.compute_sequence(seed)).collect())
    }
}
