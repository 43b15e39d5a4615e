//! Compute backend selection.
//!
//! The selector is initialized once at startup. It tries to bring up the
//! high-performance backend (a dedicated rayon pool plus a self-check run on
//! it) and, on any failure, settles permanently on the pure fallback:
//!
//! 1. **HighPerformance** - bit-packed grids, word-parallel kernel, pooled range search
//! 2. **Fallback** - cell-by-cell grid and step-by-step sequences, always available
//!
//! ```rust,ignore
//! let compute = ComputeBackend::init(&EngineConfig::from_env()).await;
//! if let InitStatus::Degraded { reason } = compute.status() {
//!     eprintln!("running without acceleration: {reason}");
//! }
//! let mut grid = compute.create_grid(200, 150)?;
//! ```

pub mod accelerated;

use std::fmt;
use std::sync::Arc;

use futures::channel::oneshot;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::config::{BackendPreference, EngineConfig};
use crate::domain::Grid;
use crate::domain::presets;
use crate::domain::sequence::{CollatzFallback, SequenceEngine};
use crate::domain::simulation::{Animated, GridSimulation};
use crate::error::EngineError;
use accelerated::{AcceleratedGrid, AcceleratedSequence};

/// Implementation family behind the engine contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    HighPerformance,
    Fallback,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::HighPerformance => write!(f, "high-performance (bit-packed, rayon)"),
            Backend::Fallback => write!(f, "fallback (pure)"),
        }
    }
}

/// Outcome of backend initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStatus {
    Ready,
    /// The high-performance backend failed; the fallback is in use
    Degraded { reason: String },
}

enum Selected {
    HighPerformance(Arc<ThreadPool>),
    Fallback,
}

/// Factory for engine instances, fixed to one backend for its lifetime
pub struct ComputeBackend {
    selected: Selected,
    status: InitStatus,
}

impl ComputeBackend {
    /// Bring up the preferred backend. Never fails: errors degrade to the fallback.
    pub async fn init(config: &EngineConfig) -> Self {
        if config.backend == BackendPreference::Fallback {
            info!("Fallback backend selected by configuration");
            return Self::fallback();
        }
        Self::from_attempt(start_high_performance(config.threads).await)
    }

    /// `init` for callers without an executor
    pub fn init_blocking(config: &EngineConfig) -> Self {
        futures::executor::block_on(Self::init(config))
    }

    /// The pure backend, chosen deliberately
    pub fn fallback() -> Self {
        Self { selected: Selected::Fallback, status: InitStatus::Ready }
    }

    pub(crate) fn from_attempt(attempt: Result<Arc<ThreadPool>, EngineError>) -> Self {
        match attempt {
            Ok(pool) => {
                info!(threads = pool.current_num_threads(), "High-performance backend ready");
                Self { selected: Selected::HighPerformance(pool), status: InitStatus::Ready }
            }
            Err(err) => {
                warn!(error = %err, "High-performance backend unavailable, using fallback");
                Self {
                    selected: Selected::Fallback,
                    status: InitStatus::Degraded { reason: err.to_string() },
                }
            }
        }
    }

    pub fn backend(&self) -> Backend {
        match self.selected {
            Selected::HighPerformance(_) => Backend::HighPerformance,
            Selected::Fallback => Backend::Fallback,
        }
    }

    pub fn status(&self) -> &InitStatus {
        &self.status
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, InitStatus::Degraded { .. })
    }

    /// New all-dead grid on the selected backend
    pub fn create_grid(&self, width: usize, height: usize) -> Result<Box<dyn GridSimulation>, EngineError> {
        debug!(width, height, backend = %self.backend(), "Creating grid");
        Ok(match &self.selected {
            Selected::HighPerformance(pool) => {
                Box::new(AcceleratedGrid::new(width, height, Arc::clone(pool))?)
            }
            Selected::Fallback => Box::new(Grid::new(width, height)?),
        })
    }

    pub fn sequence_engine(&self) -> Arc<dyn SequenceEngine> {
        match &self.selected {
            Selected::HighPerformance(pool) => Arc::new(AcceleratedSequence::new(Arc::clone(pool))),
            Selected::Fallback => Arc::new(CollatzFallback),
        }
    }
}

type SelfCheck = fn(Arc<ThreadPool>) -> Result<(), EngineError>;

async fn start_high_performance(threads: usize) -> Result<Arc<ThreadPool>, EngineError> {
    start_with_check(threads, self_check).await
}

/// Build the worker pool, then run `check` on it and wait for the verdict
async fn start_with_check(threads: usize, check: SelfCheck) -> Result<Arc<ThreadPool>, EngineError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("sim-worker-{}", i))
        // A panicking job drops its reply channel instead of aborting
        .panic_handler(|_| warn!("Worker job panicked"))
        .build()
        .map_err(|e| EngineError::BackendInit(e.to_string()))?;
    let pool = Arc::new(pool);

    let (tx, rx) = oneshot::channel();
    let worker_pool = Arc::clone(&pool);
    pool.spawn(move || {
        let _ = tx.send(check(worker_pool));
    });

    rx.await
        .map_err(|_| EngineError::BackendInit("self-check worker dropped".to_string()))??;
    Ok(pool)
}

/// Compare the accelerated implementations against the fallback on known inputs
fn self_check(pool: Arc<ThreadPool>) -> Result<(), EngineError> {
    let mut fast = AcceleratedGrid::new(70, 16, Arc::clone(&pool))?;
    let mut reference = Grid::new(70, 16)?;
    // Straddle the 64-bit word boundary
    fast.load_pattern(presets::GLIDER, 61, 2);
    reference.load_pattern(presets::GLIDER, 61, 2);
    for _ in 0..8 {
        fast.tick();
        reference.tick();
    }
    if !fast.render().eq(reference.render()) {
        return Err(EngineError::BackendInit("grid self-check mismatch".to_string()));
    }

    let sequences = AcceleratedSequence::new(pool);
    if sequences.compute_sequence(27) != CollatzFallback.compute_sequence(27)
        || sequences.find_max_in_range(1000) != CollatzFallback.find_max_in_range(1000)
    {
        return Err(EngineError::BackendInit("sequence self-check mismatch".to_string()));
    }
    Ok(())
}
