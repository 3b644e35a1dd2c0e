//! Corpus loading errors.
//!
//! Per-case variants, including a case that does not fit the descriptor
//! schema, are recorded by the loader as rejections and loading keeps going.
//! `Io` and `Parse` (TOML syntax or file header) abort the whole load.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error_code::{self, TriageErrorCode};

/// A `file:line` reference into the analyzed application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Errors that can occur while loading and validating a corpus.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CorpusError {
    #[error("Cannot read corpus {path}: {message}")]
    Io { path: String, message: String },

    #[error("Corpus parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Case {case_id} is malformed: {message}")]
    InvalidCase {
        case_id: String,
        message: String,
        location: Option<SourceLocation>,
    },

    #[error("Case {case_id} at {location} declares no paths")]
    EmptyCase {
        case_id: String,
        location: SourceLocation,
    },

    #[error("Path {case_id}/{path_id} at {location} has no sink node")]
    MissingSink {
        case_id: String,
        path_id: String,
        location: SourceLocation,
    },

    #[error("Path {case_id}/{path_id} has {count} sink nodes, second at {location}")]
    MultipleSinks {
        case_id: String,
        path_id: String,
        count: usize,
        location: SourceLocation,
    },

    #[error("Path {case_id}/{path_id}: sink at {location} is not the terminal node")]
    SinkNotTerminal {
        case_id: String,
        path_id: String,
        location: SourceLocation,
    },

    #[error("Path {case_id}/{path_id} has no nodes")]
    EmptyPath { case_id: String, path_id: String },

    #[error("Duplicate case id {case_id} at {location}")]
    DuplicateCaseId {
        case_id: String,
        location: SourceLocation,
    },

    #[error("Duplicate path id {case_id}/{path_id}")]
    DuplicatePathId { case_id: String, path_id: String },

    #[error("Invalid registry extension {path}: {message}")]
    InvalidRegistry { path: String, message: String },
}

impl CorpusError {
    /// True for per-case structural rejections, false for whole-corpus failures.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Self::Io { .. } | Self::Parse { .. } | Self::InvalidRegistry { .. }
        )
    }

    /// The case this error belongs to, if it is per-case.
    pub fn case_id(&self) -> Option<&str> {
        match self {
            Self::InvalidCase { case_id, .. }
            | Self::EmptyCase { case_id, .. }
            | Self::MissingSink { case_id, .. }
            | Self::MultipleSinks { case_id, .. }
            | Self::SinkNotTerminal { case_id, .. }
            | Self::EmptyPath { case_id, .. }
            | Self::DuplicateCaseId { case_id, .. }
            | Self::DuplicatePathId { case_id, .. } => Some(case_id),
            Self::Io { .. } | Self::Parse { .. } | Self::InvalidRegistry { .. } => None,
        }
    }

    /// Source location attached to the error, if any.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::EmptyCase { location, .. }
            | Self::MissingSink { location, .. }
            | Self::MultipleSinks { location, .. }
            | Self::SinkNotTerminal { location, .. }
            | Self::DuplicateCaseId { location, .. } => Some(location),
            Self::InvalidCase { location, .. } => location.as_ref(),
            _ => None,
        }
    }
}

impl TriageErrorCode for CorpusError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => error_code::CORPUS_IO_ERROR,
            Self::Parse { .. } | Self::InvalidRegistry { .. } => error_code::CORPUS_ERROR,
            _ => error_code::CORPUS_STRUCTURE_ERROR,
        }
    }
}
