// Domain layer - grids, sequences, patterns
pub mod domain;

// Backend selection - high-performance vs pure fallback
pub mod backend;

// Application layer - animation scheduling
pub mod application;

// Ambient concerns
pub mod cancel;
pub mod config;
pub mod error;
pub mod telemetry;

// Infrastructure layer - demo host UI and rendering
pub mod ui;
pub mod rendering;
pub mod input;

// Re-exports for convenience
pub use domain::{
    Animated, CellView, GridSimulation, Pattern, RangeResult, Sequence, SequenceEngine, Snapshot, Term,
    presets,
};
pub use backend::{Backend, ComputeBackend, InitStatus};
pub use application::{AnimationScheduler, BackgroundSearch, FrameStats, PlaybackState};
pub use cancel::CancelToken;
pub use config::{BackendPreference, EngineConfig};
pub use error::EngineError;
