//! Corpus: the immutable set of vulnerability cases, loaded once per run.

pub mod descriptor;
pub mod loader;

pub use loader::{CaseRejection, Corpus};
