//! Engine configuration.

use crate::wait::WaitState;

/// Default number of user inputs kept in the input history.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Prefix of `config` entries that declare a wait-state route.
pub const WAIT_ROUTE_PREFIX: &str = "wait_";

/// Options fixed at engine construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for template randomness; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Maximum number of inputs kept by the input history.
    pub history_limit: usize,
    /// Extra wait-state routes, applied over the built-in ones.
    pub wait_routes: Vec<(WaitState, String)>,
    /// Name used for the script in diagnostics (usually its path).
    pub source_name: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            wait_routes: Vec::new(),
            source_name: None,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the template RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bounds the input history.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Routes `state` to `intent`.
    #[must_use]
    pub fn with_wait_route(mut self, state: WaitState, intent: impl Into<String>) -> Self {
        self.wait_routes.push((state, intent.into()));
        self
    }

    /// Names the script for diagnostics.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}
