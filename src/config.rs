//! Engine configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Which backend the selector should attempt at startup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Try the high-performance backend, fall back on failure
    #[default]
    Auto,
    /// Skip the high-performance backend entirely
    Fallback,
}

impl BackendPreference {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" | "high-performance" | "fast" => Some(Self::Auto),
            "fallback" | "pure" => Some(Self::Fallback),
            _ => None,
        }
    }
}

/// Runtime configuration for the engine and the demo host.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub backend: BackendPreference,

    /// Worker threads for the high-performance pool (0 = rayon default)
    pub threads: usize,

    /// Tracing filter directive (trace, debug, info, warn, error)
    pub log_level: String,

    /// Default live-cell probability for randomize
    pub density: f64,

    pub grid_width: usize,
    pub grid_height: usize,

    /// Seed for reproducible randomize; None seeds from the OS
    pub seed: Option<u64>,

    /// Upper bound for the demo range search
    pub range_limit: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            threads: 0,
            log_level: "info".to_string(),
            density: 0.3,
            grid_width: 200,
            grid_height: 150,
            seed: None,
            range_limit: 10_000,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SIM_BACKEND`: `auto` or `fallback` (default: auto)
    /// - `SIM_THREADS`: high-performance pool size (default: 0, rayon decides)
    /// - `SIM_LOG_LEVEL` or `RUST_LOG`: log filter (default: info)
    /// - `SIM_DENSITY`: randomize probability (default: 0.3)
    /// - `SIM_GRID_WIDTH` / `SIM_GRID_HEIGHT`: demo grid size (default: 200x150)
    /// - `SIM_SEED`: RNG seed (default: unset)
    /// - `SIM_RANGE_LIMIT`: demo range search limit (default: 10000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            backend: lookup("SIM_BACKEND")
                .and_then(|v| BackendPreference::parse(&v))
                .unwrap_or(defaults.backend),

            threads: parse_var(&lookup, "SIM_THREADS").unwrap_or(defaults.threads),

            log_level: lookup("SIM_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            density: parse_var(&lookup, "SIM_DENSITY")
                .filter(|d: &f64| (0.0..=1.0).contains(d))
                .unwrap_or(defaults.density),

            grid_width: parse_var(&lookup, "SIM_GRID_WIDTH")
                .filter(|w: &usize| *w > 0)
                .unwrap_or(defaults.grid_width),

            grid_height: parse_var(&lookup, "SIM_GRID_HEIGHT")
                .filter(|h: &usize| *h > 0)
                .unwrap_or(defaults.grid_height),

            seed: parse_var(&lookup, "SIM_SEED"),

            range_limit: parse_var(&lookup, "SIM_RANGE_LIMIT").unwrap_or(defaults.range_limit),
        }
    }

    /// Builder-style override of the backend preference
    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
