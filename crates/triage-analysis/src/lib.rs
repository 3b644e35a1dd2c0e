//! Taint-path classification model.
//!
//! A vulnerability case is one sink reached by one or more candidate paths.
//! Each path is folded for liveness, its sanitizers and guards are tiered by
//! a table-driven registry, and the resolver reduces per-path verdicts to a
//! single case verdict with subcategory and confidence.
//!
//! Data flows one way: corpus → paths → path verdicts → case verdict → report.

pub mod classifier;
pub mod corpus;
pub mod engine;
pub mod grading;
pub mod liveness;
pub mod model;
pub mod report;
pub mod resolver;

pub use classifier::ClassifierRegistry;
pub use corpus::Corpus;
pub use engine::{classify_corpus, run_pipeline};
pub use model::*;
pub use report::{TriageReport, VerdictRecord};
pub use resolver::{resolve_case, resolve_path};
