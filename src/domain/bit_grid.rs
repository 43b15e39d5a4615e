//! Bit-packed cell storage for the high-performance backend.
//!
//! Each row is padded to whole 64-bit words; bit `i` of word `k` in a row
//! holds column `k * 64 + i`. Padding bits past `width` are always zero so
//! the word-parallel kernel can read whole words without masking inputs.

use rand::{Rng, RngCore};

use super::grid::cell_count;
use crate::error::EngineError;

/// Bit-packed grid storing cells as individual bits
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitGrid {
    width: usize,
    height: usize,
    /// Words per row (ceil(width / 64))
    chunk_width: usize,
    /// Valid-bit mask for the last word of every row
    tail_mask: u64,
    /// Flat array of words, row-major order
    words: Vec<u64>,
}

impl BitGrid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        cell_count(width, height)?;
        let chunk_width = width.div_ceil(64);
        let total_words = chunk_width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions { width, height })?;

        let tail_bits = width % 64;
        let tail_mask = if tail_bits == 0 { u64::MAX } else { (1u64 << tail_bits) - 1 };

        Ok(Self {
            width,
            height,
            chunk_width,
            tail_mask,
            words: vec![0; total_words],
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    pub fn tail_mask(&self) -> u64 {
        self.tail_mask
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.words[y * self.chunk_width + x / 64];
        (word >> (x % 64)) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let word = &mut self.words[y * self.chunk_width + x / 64];
        let bit = 1u64 << (x % 64);
        if alive {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    /// Raw words of row `y`; empty when `y` is off the grid
    #[inline]
    pub fn row(&self, y: usize) -> &[u64] {
        if y >= self.height {
            return &[];
        }
        let start = y * self.chunk_width;
        &self.words[start..start + self.chunk_width]
    }

    /// Mutable raw words, row-major, for kernels writing a whole generation
    pub fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Total memory usage in bytes
    pub fn memory_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }

    pub fn count_alive(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// One Bernoulli draw per cell in row-major order, the same sequence
    /// of draws the fallback grid makes.
    pub fn randomize_with(&mut self, probability: f64, rng: &mut dyn RngCore) {
        for y in 0..self.height {
            let row = &mut self.words[y * self.chunk_width..(y + 1) * self.chunk_width];
            for (k, slot) in row.iter_mut().enumerate() {
                let bits = (self.width - k * 64).min(64);
                let mut word = 0u64;
                for bit in 0..bits {
                    if rng.random_bool(probability) {
                        word |= 1u64 << bit;
                    }
                }
                *slot = word;
            }
        }
    }
}
