//! Sanitizer/guard classifier: maps protections to strength/category tiers.

pub mod builtin;
pub mod pattern;
pub mod registry;

pub use pattern::{MatchMode, PatternMetadata, Polarity};
pub use registry::{ClassifierRegistry, SanitizerClass};
