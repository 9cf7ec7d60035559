//! Run configuration
//!
//! Controls how fuzz tests are resolved. Unit tests ignore both settings.

use testloom_core::{DEFAULT_RUNS, Seed};

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Generated inputs per fuzz test
    pub runs: u32,
    /// Explicit seed; when `None` the seed is derived from the start time
    pub seed: Option<Seed>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of generated inputs per fuzz test
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    /// Pin the seed
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }
}
