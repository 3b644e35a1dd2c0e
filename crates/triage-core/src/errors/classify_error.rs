//! Classification errors.

use super::error_code::{self, TriageErrorCode};

/// Errors that can occur while classifying a corpus.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Failed to build classification thread pool: {0}")]
    ThreadPool(String),
}

impl TriageErrorCode for ClassifyError {
    fn error_code(&self) -> &'static str {
        error_code::CLASSIFY_ERROR
    }
}
