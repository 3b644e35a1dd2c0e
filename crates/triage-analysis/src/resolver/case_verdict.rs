//! Case-level reduction of per-path verdicts.
//!
//! The reduction tallies path outcomes and matches on the outcome each rule
//! would cite, so every arm has its evidence in hand and the result does not
//! depend on the order paths are visited in. Only the
//! representative subcategory of a sanitized case uses declaration order,
//! and only as the final tie-break.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use triage_core::constants::{
    CONFIDENCE_DEAD_CODE, CONFIDENCE_GOOD_TO_FIX, CONFIDENCE_GOOD_TO_FIX_CAP, CONFIDENCE_MIXED,
    CONFIDENCE_MUST_FIX, CONFIDENCE_MUST_FIX_CAP, CONFIDENCE_NO_GUARD_BONUS,
    CONFIDENCE_PROTECTED_LAYERED, CONFIDENCE_PROTECTED_SINGLE, CONFIDENCE_SANITIZED,
};

use super::path_verdict::{resolve_path, PathOutcome, PathRule};
use crate::model::{CaseVerdict, PathVerdict, Subcategory, VulnerabilityCase};

/// The single graded verdict of a case, with per-path detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResolution {
    pub case_id: String,
    pub overall: CaseVerdict,
    pub subcategory: Option<Subcategory>,
    pub confidence: f64,
    pub rationale: String,
    pub paths: Vec<PathOutcome>,
}

/// Counts per outcome kind, plus the outcome each case rule cites. A rule's
/// representative is present exactly when its count is non-zero.
#[derive(Debug, Default)]
struct Tally<'a> {
    unmitigated: usize,
    weak: usize,
    dead: usize,
    sanitized: usize,
    protected: usize,
    first_unmitigated: Option<&'a PathOutcome>,
    first_weak: Option<&'a PathOutcome>,
    strongest_sanitized: Option<&'a PathOutcome>,
    first_protected: Option<&'a PathOutcome>,
}

impl<'a> Tally<'a> {
    fn of(outcomes: &'a [PathOutcome]) -> Self {
        let mut tally = Self::default();
        for outcome in outcomes {
            match (outcome.verdict, outcome.weakly_mitigated) {
                (PathVerdict::Exploitable, false) => {
                    tally.unmitigated += 1;
                    tally.first_unmitigated.get_or_insert(outcome);
                }
                (PathVerdict::Exploitable, true) => {
                    tally.weak += 1;
                    tally.first_weak.get_or_insert(outcome);
                }
                (PathVerdict::DeadCode, _) => tally.dead += 1,
                (PathVerdict::SafeSanitized, _) => {
                    tally.sanitized += 1;
                    tally.strongest_sanitized = Some(stronger(tally.strongest_sanitized, outcome));
                }
                (PathVerdict::SafeProtected, _) => {
                    tally.protected += 1;
                    tally.first_protected.get_or_insert(outcome);
                }
            }
        }
        tally
    }
}

/// Most strong sanitizers, then highest evidence rank; the earlier declared
/// path wins ties.
fn stronger<'a>(best: Option<&'a PathOutcome>, candidate: &'a PathOutcome) -> &'a PathOutcome {
    match best {
        Some(b)
            if (candidate.strong_sanitizers, candidate.evidence_rank)
                <= (b.strong_sanitizers, b.evidence_rank) =>
        {
            b
        }
        _ => candidate,
    }
}

/// Resolve a case: every path, then the precedence table.
#[instrument(level = "debug", skip(case), fields(case_id = %case.id, paths = case.paths.len()))]
pub fn resolve_case(case: &VulnerabilityCase) -> CaseResolution {
    let outcomes: Vec<PathOutcome> = case.paths.iter().map(resolve_path).collect();
    let tally = Tally::of(&outcomes);
    let no_guards = !case.has_guards();

    let (overall, subcategory, confidence, rationale) = match (
        tally.first_unmitigated,
        tally.first_weak,
        tally.strongest_sanitized,
        tally.first_protected,
    ) {
        (Some(first), _, _, _) => (
            CaseVerdict::MustFix,
            None,
            boosted(CONFIDENCE_MUST_FIX, no_guards, CONFIDENCE_MUST_FIX_CAP),
            format!(
                "{} of {} paths exploitable without mitigation; `{}`: {}",
                tally.unmitigated,
                outcomes.len(),
                first.path_id,
                first.rationale
            ),
        ),
        (None, Some(first), _, _) => (
            CaseVerdict::GoodToFix,
            None,
            boosted(CONFIDENCE_GOOD_TO_FIX, no_guards, CONFIDENCE_GOOD_TO_FIX_CAP),
            format!("fix still warranted, `{}`: {}", first.path_id, first.rationale),
        ),
        (None, None, None, None) => (
            CaseVerdict::FalsePositiveDeadCode,
            None,
            CONFIDENCE_DEAD_CODE,
            format!("all {} paths are unreachable", tally.dead),
        ),
        (None, None, Some(best), None) => (
            CaseVerdict::FalsePositiveSanitized,
            best.subcategory,
            CONFIDENCE_SANITIZED,
            format!(
                "every live path is sanitized ({} dead); strongest `{}`: {}",
                tally.dead, best.path_id, best.rationale
            ),
        ),
        (None, None, None, Some(first)) => {
            let layered = outcomes.iter().any(|o| o.rule == PathRule::DefenseInDepth);
            let (subcategory, confidence) = if layered {
                (Subcategory::Protected3B, CONFIDENCE_PROTECTED_LAYERED)
            } else {
                (Subcategory::Protected3A, CONFIDENCE_PROTECTED_SINGLE)
            };
            (
                CaseVerdict::FalsePositiveProtected,
                Some(subcategory),
                confidence,
                format!(
                    "every live path is protected ({} dead); `{}`: {}",
                    tally.dead, first.path_id, first.rationale
                ),
            )
        }
        (None, None, Some(_), Some(_)) => (
            CaseVerdict::FalsePositive,
            None,
            CONFIDENCE_MIXED,
            format!(
                "live paths mix sanitized ({}) and protected ({}); see per-path detail",
                tally.sanitized, tally.protected
            ),
        ),
    };

    CaseResolution {
        case_id: case.id.clone(),
        overall,
        subcategory,
        confidence,
        rationale,
        paths: outcomes,
    }
}

fn boosted(base: f64, no_guards: bool, cap: f64) -> f64 {
    let bonus = if no_guards { CONFIDENCE_NO_GUARD_BONUS } else { 0.0 };
    (base + bonus).min(cap)
}
