//! Word-parallel Life evolution on bit-packed rows.
//!
//! Uses bit manipulation to process 64 cells at once:
//! - Horizontal neighbors: shift the row's words left/right, carrying the
//!   edge bit in from the adjacent word
//! - Vertical neighbors: the same words of the rows above and below
//! - Counting: carry-save adder tree producing a 4-bit count per cell
//!
//! Edges are bounded: rows above the first and below the last, and columns
//! outside the grid, read as dead.

use rayon::prelude::*;

use super::bit_grid::BitGrid;

/// Full adder: sum = a XOR b XOR c, carry = majority(a, b, c)
#[inline]
fn full_adder(a: u64, b: u64, c: u64) -> (u64, u64) {
    let sum = a ^ b ^ c;
    let carry = (a & b) | (c & (a ^ b));
    (sum, carry)
}

/// Half adder: sum = a XOR b, carry = a AND b
#[inline]
fn half_adder(a: u64, b: u64) -> (u64, u64) {
    (a ^ b, a & b)
}

#[inline]
fn word_at(row: &[u64], k: usize) -> u64 {
    row.get(k).copied().unwrap_or(0)
}

/// The word at `k` plus its west (x-1) and east (x+1) neighbors, each
/// aligned so bit `i` refers to the neighbor of cell `i`.
#[inline]
fn neighborhood(row: &[u64], k: usize) -> (u64, u64, u64) {
    let current = word_at(row, k);
    let prev = if k > 0 { word_at(row, k - 1) } else { 0 };
    let next = word_at(row, k + 1);

    let west = (current << 1) | (prev >> 63);
    let east = (current >> 1) | (next << 63);
    (west, current, east)
}

/// Count eight neighbor words per bit position.
/// Returns (bit0, bit1, bit2, bit3) where count = bit3*8 + bit2*4 + bit1*2 + bit0
#[inline]
fn count_neighbors(n: [u64; 8]) -> (u64, u64, u64, u64) {
    let (s1, c1) = full_adder(n[0], n[1], n[2]);
    let (s2, c2) = full_adder(n[3], n[4], n[5]);
    let (s3, c3) = half_adder(n[6], n[7]);

    // Ones column
    let (bit0, c4) = full_adder(s1, s2, s3);

    // Twos column: c1 + c2 + c3 + c4
    let (t, c5) = full_adder(c1, c2, c3);
    let (bit1, c6) = half_adder(t, c4);

    // Fours column: c5 + c6
    let (bit2, bit3) = half_adder(c5, c6);

    (bit0, bit1, bit2, bit3)
}

/// Next state of the 64 cells in `current` given its eight neighbor words.
///
/// B3/S23: count == 3, or alive and count == 2.
#[inline]
pub fn next_word(current: u64, neighbors: [u64; 8]) -> u64 {
    let (bit0, bit1, bit2, bit3) = count_neighbors(neighbors);
    let two_or_three = !bit3 & !bit2 & bit1;
    two_or_three & (bit0 | current)
}

/// Evolve one row of words into `out`.
///
/// `above` and `below` are empty at the grid's top and bottom edges.
/// `tail_mask` clears births in the padding past the last column.
pub fn evolve_row(above: &[u64], current: &[u64], below: &[u64], out: &mut [u64], tail_mask: u64) {
    let last = out.len().saturating_sub(1);

    for (k, slot) in out.iter_mut().enumerate() {
        let (aw, a, ae) = neighborhood(above, k);
        let (cw, c, ce) = neighborhood(current, k);
        let (bw, b, be) = neighborhood(below, k);

        let word = next_word(c, [aw, a, ae, cw, ce, bw, b, be]);
        *slot = if k == last { word & tail_mask } else { word };
    }
}

fn rows_around(grid: &BitGrid, y: usize) -> (&[u64], &[u64], &[u64]) {
    let above = if y > 0 { grid.row(y - 1) } else { &[] };
    (above, grid.row(y), grid.row(y + 1))
}

/// Serial evolution of `src` into `dst`. Both must share dimensions.
pub fn evolve_into(src: &BitGrid, dst: &mut BitGrid) {
    debug_assert_eq!(src.dimensions(), dst.dimensions());
    let chunk_width = src.chunk_width();
    let tail_mask = src.tail_mask();

    for (y, row_out) in dst.words_mut().chunks_mut(chunk_width).enumerate() {
        let (above, current, below) = rows_around(src, y);
        evolve_row(above, current, below, row_out, tail_mask);
    }
}

/// Parallel evolution of `src` into `dst` on the current rayon pool.
/// Batches rows per task to keep scheduling overhead low.
pub fn evolve_into_parallel(src: &BitGrid, dst: &mut BitGrid) {
    debug_assert_eq!(src.dimensions(), dst.dimensions());
    let (_, height) = src.dimensions();
    let chunk_width = src.chunk_width();
    let tail_mask = src.tail_mask();

    // Target: ~32 tasks per thread for load balancing
    let num_threads = rayon::current_num_threads();
    let min_rows_per_task = (height / (num_threads * 32)).max(4);

    dst.words_mut()
        .par_chunks_mut(chunk_width)
        .enumerate()
        .with_min_len(min_rows_per_task)
        .for_each(|(y, row_out)| {
            let (above, current, below) = rows_around(src, y);
            evolve_row(above, current, below, row_out, tail_mask);
        });
}
