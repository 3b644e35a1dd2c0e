//! Classification engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THREADS;

/// Configuration for the classification engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Worker threads. 0 = rayon's global pool. Default: 0.
    pub threads: Option<usize>,
    /// Classify cases in parallel. Default: true.
    pub parallel: Option<bool>,
}

impl ClassifyConfig {
    /// Returns the effective thread count, defaulting to 0 (rayon default).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }

    /// Returns whether cases are classified in parallel, defaulting to true.
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
