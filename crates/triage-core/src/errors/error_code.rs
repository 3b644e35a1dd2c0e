//! TriageErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured error code
/// string to report consumers and the CLI exit path.
pub trait TriageErrorCode {
    /// Returns the error code string (e.g., "CORPUS_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn display_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CORPUS_ERROR: &str = "CORPUS_ERROR";
pub const CORPUS_IO_ERROR: &str = "CORPUS_IO_ERROR";
pub const CORPUS_STRUCTURE_ERROR: &str = "CORPUS_STRUCTURE_ERROR";
pub const CLASSIFY_ERROR: &str = "CLASSIFY_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const GRADE_ERROR: &str = "GRADE_ERROR";
