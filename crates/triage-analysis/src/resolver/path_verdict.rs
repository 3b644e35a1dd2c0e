//! Per-path verdict: first matching rule wins.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::liveness::Liveness;
use crate::model::{Path, PathVerdict, SourceLocation, Subcategory};

/// The rule of the per-path table that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathRule {
    Dead,
    StrongSanitizer,
    DefenseInDepth,
    SingleAccessControl,
    WeakSanitizer,
    Unmitigated,
}

impl PathRule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dead => "dead",
            Self::StrongSanitizer => "strong_sanitizer",
            Self::DefenseInDepth => "defense_in_depth",
            Self::SingleAccessControl => "single_access_control",
            Self::WeakSanitizer => "weak_sanitizer",
            Self::Unmitigated => "unmitigated",
        }
    }
}

/// Resolved state of one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOutcome {
    pub path_id: String,
    pub verdict: PathVerdict,
    /// Exploitable, but only a weak sanitizer stands before the sink.
    pub weakly_mitigated: bool,
    pub subcategory: Option<Subcategory>,
    pub rule: PathRule,
    pub rationale: String,
    pub evidence: Vec<SourceLocation>,
    /// Strong sanitizers before the sink; ranks sanitized paths at case level.
    pub strong_sanitizers: usize,
    /// Evidence rank of the decisive strong sanitizer, 0 without one.
    pub evidence_rank: u8,
}

/// Reduce one path to its verdict.
#[instrument(level = "debug", skip(path), fields(path_id = %path.id))]
pub fn resolve_path(path: &Path) -> PathOutcome {
    let mut outcome = PathOutcome {
        path_id: path.id.clone(),
        verdict: PathVerdict::Exploitable,
        weakly_mitigated: false,
        subcategory: None,
        rule: PathRule::Unmitigated,
        rationale: String::new(),
        evidence: path.evidence(),
        strong_sanitizers: 0,
        evidence_rank: 0,
    };

    if let Liveness::Dead {
        condition,
        value,
        evidence,
    } = &path.liveness
    {
        outcome.verdict = PathVerdict::DeadCode;
        outcome.rule = PathRule::Dead;
        outcome.rationale = match evidence {
            Some(at) => format!("unreachable: `{condition}` is constant {value} at {at}"),
            None => format!("unreachable: `{condition}` is constant {value}"),
        };
        return outcome;
    }

    if let Some(decisive) = path.decisive_strong_sanitizer() {
        outcome.verdict = PathVerdict::SafeSanitized;
        outcome.rule = PathRule::StrongSanitizer;
        outcome.subcategory = decisive.category.subcategory();
        outcome.strong_sanitizers = path.strong_sanitizers().count();
        outcome.evidence_rank = decisive.category.evidence_rank();
        outcome.rationale = format!(
            "strong sanitizer `{}` ({}) at {} precedes the sink",
            decisive.node.identity,
            decisive
                .technique
                .map(|t| t.name())
                .unwrap_or(decisive.category.name()),
            decisive.node.evidence,
        );
        return outcome;
    }

    if path.has_guards() && path.is_defense_in_depth() {
        let mut categories: Vec<_> = path
            .guards
            .iter()
            .map(|g| g.category)
            .filter(|c| c.is_layer())
            .collect();
        categories.sort();
        categories.dedup();
        let names: Vec<&str> = categories.iter().map(|c| c.name()).collect();
        outcome.verdict = PathVerdict::SafeProtected;
        outcome.rule = PathRule::DefenseInDepth;
        outcome.subcategory = Some(Subcategory::Protected3B);
        outcome.rationale = format!(
            "defense in depth: {} guard layers ({})",
            names.len(),
            names.join(", ")
        );
        return outcome;
    }

    let access_control: Vec<_> = path.access_control_guards().collect();
    if let [only] = access_control.as_slice() {
        if path.disqualifiers.is_empty() {
            outcome.verdict = PathVerdict::SafeProtected;
            outcome.rule = PathRule::SingleAccessControl;
            outcome.subcategory = Some(Subcategory::Protected3A);
            outcome.rationale = format!(
                "{} guard `{}` at {} gates the sink",
                only.category, only.node.identity, only.node.evidence
            );
            return outcome;
        }
    }

    if let Some(weak) = path.weak_sanitizers().next() {
        outcome.weakly_mitigated = true;
        outcome.rule = PathRule::WeakSanitizer;
        outcome.rationale = format!(
            "only weak sanitizer `{}` at {} precedes the sink; bypassable",
            weak.node.identity, weak.node.evidence
        );
        return outcome;
    }

    outcome.rationale = match (access_control.len(), path.disqualifiers.first()) {
        (1, Some(reason)) => format!(
            "live path to {}; access-control guard disqualified: {reason}",
            path.sink().evidence
        ),
        (n, _) if n > 1 => format!(
            "live path to {}; {n} access-control guards do not add up to defense in depth",
            path.sink().evidence
        ),
        _ => format!(
            "live path reaches sink `{}` at {} with no effective sanitizer or guard",
            path.sink().identity,
            path.sink().evidence
        ),
    };
    outcome
}
