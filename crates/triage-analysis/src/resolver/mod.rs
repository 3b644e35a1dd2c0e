//! Classification resolver: path verdicts and their case-level reduction.

pub mod case_verdict;
pub mod path_verdict;

pub use case_verdict::{resolve_case, CaseResolution};
pub use path_verdict::{resolve_path, PathOutcome, PathRule};
