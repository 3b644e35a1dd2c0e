//! Corpus source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CORPUS_PATH;

/// Where the corpus description and registry extensions are read from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CorpusConfig {
    /// Corpus description file. Default: `corpus/python_banking.toml`.
    pub path: Option<PathBuf>,
    /// Optional TOML file extending the built-in sanitizer/guard registry.
    pub registry_path: Option<PathBuf>,
}

impl CorpusConfig {
    /// Returns the effective corpus path, defaulting to the banking corpus.
    pub fn effective_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS_PATH))
    }
}
