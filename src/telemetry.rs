//! Tracing subscriber setup.

use crate::config::EngineConfig;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by the configured log level.
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(config: &EngineConfig) -> bool {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
