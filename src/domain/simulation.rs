//! Operation contract shared by both grid backends.
//!
//! `Animated` is the minimal tick+render surface the scheduler drives;
//! `GridSimulation` adds the direct mutations a caller performs between
//! frames.

use rand::RngCore;

use super::patterns::{self, Glyph};
use crate::backend::Backend;

/// Live-cell probability used when the caller has no preference
pub const DEFAULT_DENSITY: f64 = 0.3;

/// Read-only access to cell states
pub trait CellView {
    fn dimensions(&self) -> (usize, usize);

    /// Cell state at (x, y); false outside the grid
    fn is_alive(&self, x: usize, y: usize) -> bool;
}

/// Anything the animation scheduler can drive
pub trait Animated {
    /// Advance one generation
    fn tick(&mut self);

    /// Row-major snapshot of the current state
    fn render(&self) -> Snapshot<'_>;
}

impl<A: Animated + ?Sized> Animated for Box<A> {
    fn tick(&mut self) {
        (**self).tick()
    }

    fn render(&self) -> Snapshot<'_> {
        (**self).render()
    }
}

/// A bounded Conway grid, implemented by both compute backends.
///
/// Coordinates for writes are signed: anything outside
/// `[0, width) x [0, height)` is silently ignored.
pub trait GridSimulation: Animated + CellView + Send {
    fn backend(&self) -> Backend;

    /// Number of ticks since creation
    fn generation(&self) -> u64;

    fn set_cell(&mut self, x: i64, y: i64, alive: bool);

    /// Set each cell alive with `probability`, drawing once per cell in
    /// row-major order from `rng`.
    fn randomize_with(&mut self, probability: f64, rng: &mut dyn RngCore);

    /// Kill every cell. The generation counter is kept.
    fn clear(&mut self);

    /// Count of live cells
    fn population(&self) -> usize {
        self.render().filter(|&alive| alive).count()
    }

    /// Randomize from the thread RNG
    fn randomize(&mut self, probability: f64) {
        let mut rng = rand::rng();
        self.randomize_with(probability, &mut rng);
    }

    /// Stamp glyph text at the given origin without clearing first.
    fn load_pattern(&mut self, text: &str, origin_x: i64, origin_y: i64) {
        for (column, row, glyph) in patterns::glyphs(text) {
            let alive = match glyph {
                Glyph::Alive => true,
                Glyph::Dead => false,
                Glyph::Skip => continue,
            };
            self.set_cell(
                origin_x.saturating_add(column as i64),
                origin_y.saturating_add(row as i64),
                alive,
            );
        }
    }
}

/// Map signed coordinates into the grid, or None when out of bounds
#[inline]
pub(crate) fn checked_coords(width: usize, height: usize, x: i64, y: i64) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    (x < width && y < height).then_some((x, y))
}

/// Clamp a probability into [0, 1]; NaN becomes 0
#[inline]
pub(crate) fn sanitize_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

/// Restartable row-major iterator over a grid's cells.
///
/// Cloning yields an independent cursor from the same position, and
/// calling `render()` again starts over.
#[derive(Clone)]
pub struct Snapshot<'a> {
    view: &'a dyn CellView,
    width: usize,
    next: usize,
    end: usize,
}

impl<'a> Snapshot<'a> {
    pub fn new(view: &'a dyn CellView) -> Self {
        let (width, height) = view.dimensions();
        Self {
            view,
            width,
            next: 0,
            end: width * height,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.view.dimensions()
    }

    /// 0/1 byte per cell, row-major
    pub fn to_bytes(self) -> Vec<u8> {
        self.map(u8::from).collect()
    }

    /// Coordinates of live cells, row-major
    pub fn live_cells(self) -> impl Iterator<Item = (usize, usize)> + 'a {
        let width = self.width;
        self.enumerate()
            .filter(|&(_, alive)| alive)
            .map(move |(idx, _)| (idx % width, idx / width))
    }
}

impl Iterator for Snapshot<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.next >= self.end {
            return None;
        }
        let idx = self.next;
        self.next += 1;
        Some(self.view.is_alive(idx % self.width, idx / self.width))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Snapshot<'_> {}
