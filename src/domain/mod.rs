mod cell;
mod grid;
pub mod bit_grid;
pub mod patterns;
pub mod sequence;
pub mod simd_life;
pub mod simulation;

pub use cell::Cell;
pub use grid::Grid;
pub use bit_grid::BitGrid;
pub use patterns::{Glyph, Pattern, presets};
pub use sequence::{CollatzFallback, RangeResult, Sequence, SequenceEngine, Term};
pub use simulation::{Animated, CellView, GridSimulation, Snapshot, DEFAULT_DENSITY};
