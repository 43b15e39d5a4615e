use thiserror::Error;

/// Errors surfaced by the engine's public operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("high-performance backend failed to initialize: {0}")]
    BackendInit(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("step is only allowed while paused")]
    StepWhilePlaying,

    #[error("no simulation attached to the scheduler")]
    NoTarget,
}
