//! Pipeline errors and non-fatal error collection.

use super::error_code::TriageErrorCode;
use super::{ClassifyError, ConfigError, CorpusError, GradeError, ReportError};

/// Errors that can occur during a full load → classify → report run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Grading error: {0}")]
    Grade(#[from] GradeError),
}

impl TriageErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Corpus(e) => e.error_code(),
            Self::Classify(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Grade(e) => e.error_code(),
        }
    }
}

/// Result of a run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some cases are rejected.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new pipeline result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: impl Into<PipelineError>) {
        self.errors.push(error.into());
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
