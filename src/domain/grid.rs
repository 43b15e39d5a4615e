use rand::{Rng, RngCore};

use super::Cell;
use super::simulation::{
    Animated, CellView, GridSimulation, Snapshot, checked_coords, sanitize_probability,
};
use crate::backend::Backend;
use crate::error::EngineError;

/// Pure fallback grid: one `Cell` per position, evolved cell by cell.
///
/// Two buffers of equal length; `tick` reads `cells`, writes `scratch`,
/// then swaps them.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    scratch: Vec<Cell>,
    generation: u64,
}

impl Grid {
    /// Create a grid with all cells dead
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Dead; len],
            scratch: vec![Cell::Dead; len],
            generation: 0,
        })
    }

    /// Convert 2D coordinates to 1D index
    const fn get_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Get cell at position (with bounds checking)
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[self.get_index(x, y)])
    }

    /// Live Moore neighbors; positions off the grid count as dead
    fn count_live_neighbors(&self, x: usize, y: usize) -> u8 {
        let x_range = x.saturating_sub(1)..=(x + 1).min(self.width - 1);
        let y_range = y.saturating_sub(1)..=(y + 1).min(self.height - 1);

        y_range
            .flat_map(|ny| x_range.clone().map(move |nx| (nx, ny)))
            .filter(|&(nx, ny)| (nx, ny) != (x, y))
            .filter(|&(nx, ny)| self.cells[self.get_index(nx, ny)].is_alive())
            .count() as u8
    }
}

/// Validate dimensions and return the buffer length
pub(crate) fn cell_count(width: usize, height: usize) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(EngineError::InvalidDimensions { width, height })
}

impl CellView for Grid {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn is_alive(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(Cell::is_alive)
    }
}

impl Animated for Grid {
    fn tick(&mut self) {
        let mut next = std::mem::take(&mut self.scratch);
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.get_index(x, y);
                next[idx] = self.cells[idx].evolve(self.count_live_neighbors(x, y));
            }
        }
        self.scratch = std::mem::replace(&mut self.cells, next);
        self.generation += 1;
    }

    fn render(&self) -> Snapshot<'_> {
        Snapshot::new(self)
    }
}

impl GridSimulation for Grid {
    fn backend(&self) -> Backend {
        Backend::Fallback
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn set_cell(&mut self, x: i64, y: i64, alive: bool) {
        if let Some((x, y)) = checked_coords(self.width, self.height, x, y) {
            let idx = self.get_index(x, y);
            self.cells[idx] = Cell::from(alive);
        }
    }

    fn randomize_with(&mut self, probability: f64, rng: &mut dyn RngCore) {
        let probability = sanitize_probability(probability);
        self.cells
            .iter_mut()
            .for_each(|cell| *cell = Cell::from(rng.random_bool(probability)));
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::Dead);
    }

    fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }
}
