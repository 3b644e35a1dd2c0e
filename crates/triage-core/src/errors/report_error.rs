//! Report emission errors.

use super::error_code::{self, TriageErrorCode};

/// Errors that can occur while serializing or writing a verdict report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report serialization failed: {0}")]
    Serialize(String),

    #[error("Cannot write report to {path}: {message}")]
    Io { path: String, message: String },
}

impl TriageErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
