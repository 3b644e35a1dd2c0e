//! Grading errors.

use super::error_code::{self, TriageErrorCode};

/// Errors that can occur while grading scanner submissions.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("Cannot parse submissions from {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Cannot read submissions {path}: {message}")]
    Io { path: String, message: String },
}

impl TriageErrorCode for GradeError {
    fn error_code(&self) -> &'static str {
        error_code::GRADE_ERROR
    }
}
