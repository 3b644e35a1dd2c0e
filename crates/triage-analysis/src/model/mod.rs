//! Corpus data model: nodes, paths, cases, and verdict kinds.

pub mod case;
pub mod path;
pub mod types;
pub mod verdict;

pub use case::{EntryDescriptor, Expectation, VulnerabilityCase};
pub use path::{AppliedGuard, AppliedSanitizer, Path};
pub use types::*;
pub use verdict::*;
