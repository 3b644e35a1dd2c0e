//! Error handling for triage.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod classify_error;
pub mod config_error;
pub mod corpus_error;
pub mod error_code;
pub mod grade_error;
pub mod pipeline_error;
pub mod report_error;

pub use classify_error::ClassifyError;
pub use config_error::ConfigError;
pub use corpus_error::{CorpusError, SourceLocation};
pub use error_code::TriageErrorCode;
pub use grade_error::GradeError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use report_error::ReportError;
