//! Liveness evaluation by constant-condition folding.
//!
//! A path is live iff every controlling flag folds to the value that routes
//! execution onto the path. No flags means live: liveness is an explicit
//! opt-in annotation, never inferred. Request data is never a flag.

use serde::{Deserialize, Serialize};

use crate::model::{LivenessFlag, SourceLocation};

/// Result of folding a path's controlling conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Liveness {
    Live,
    /// The first condition that routes execution elsewhere.
    Dead {
        condition: String,
        value: bool,
        evidence: Option<SourceLocation>,
    },
}

impl Liveness {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Fold the flags in declaration order; the first inconsistent flag wins.
pub fn evaluate(flags: &[LivenessFlag]) -> Liveness {
    match flags.iter().find(|flag| !flag.is_consistent()) {
        None => Liveness::Live,
        Some(flag) => Liveness::Dead {
            condition: flag.condition.clone(),
            value: flag.value,
            evidence: flag.evidence.clone(),
        },
    }
}
