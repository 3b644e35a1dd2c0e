//! Paths: ordered node sequences from entry to a single terminal sink.

use serde::{Deserialize, Serialize};
use triage_core::constants::DEFENSE_IN_DEPTH_MIN_LAYERS;
use triage_core::errors::CorpusError;
use triage_core::types::collections::{FxHashSet, SmallVec4};

use super::types::{
    GuardCategory, LivenessFlag, Node, SanitizerCategory, SanitizerStrength, SanitizerTechnique,
    SourceLocation,
};
use crate::liveness::{self, Liveness};

/// A sanitizer attached to a path, already tiered by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedSanitizer {
    pub node: Node,
    pub strength: SanitizerStrength,
    pub category: SanitizerCategory,
    /// Technique the tier was derived from; `None` when unrecognized.
    pub technique: Option<SanitizerTechnique>,
    /// Index of the matching sanitizer node in the path, `None` if the
    /// sanitizer is not on the node sequence (and so not before the sink).
    pub position: Option<usize>,
}

impl AppliedSanitizer {
    pub fn is_before_sink(&self) -> bool {
        self.position.is_some()
    }
}

/// A guard attached to a path, already categorized by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppliedGuard {
    pub node: Node,
    pub category: GuardCategory,
}

/// One candidate execution path from entry to sink.
///
/// Constructed only through [`Path::new`], which enforces the single
/// terminal sink and computes liveness once. Deserialization goes through
/// the same constructor; a serialized `liveness` is ignored and recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PathParts")]
pub struct Path {
    pub id: String,
    pub nodes: Vec<Node>,
    pub liveness_flags: Vec<LivenessFlag>,
    pub liveness: Liveness,
    pub sanitizers: Vec<AppliedSanitizer>,
    /// Deduplicated by guard identity, declaration order kept.
    pub guards: SmallVec4<AppliedGuard>,
    /// Explicit factors that disqualify a lone access-control guard.
    pub disqualifiers: Vec<String>,
}

impl Path {
    /// Build a path, validating its shape.
    ///
    /// `case_id` is only used for error context.
    pub fn new(
        case_id: &str,
        id: impl Into<String>,
        nodes: Vec<Node>,
        liveness_flags: Vec<LivenessFlag>,
        sanitizers: Vec<AppliedSanitizer>,
        guards: Vec<AppliedGuard>,
        disqualifiers: Vec<String>,
    ) -> Result<Self, CorpusError> {
        let id = id.into();
        validate_shape(case_id, &id, &nodes)?;

        let mut seen = FxHashSet::default();
        let guards: SmallVec4<AppliedGuard> = guards
            .into_iter()
            .filter(|g| seen.insert(g.node.identity.clone()))
            .collect();

        let liveness = liveness::evaluate(&liveness_flags);

        Ok(Self {
            id,
            nodes,
            liveness_flags,
            liveness,
            sanitizers,
            guards,
            disqualifiers,
        })
    }

    /// The terminal sink node.
    pub fn sink(&self) -> &Node {
        // Shape validation guarantees a non-empty sequence ending in the sink.
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn is_live(&self) -> bool {
        self.liveness.is_live()
    }

    /// Strong sanitizers positioned before the sink, in node order.
    pub fn strong_sanitizers(&self) -> impl Iterator<Item = &AppliedSanitizer> {
        self.effective_sanitizers(SanitizerStrength::Strong)
    }

    /// Weak sanitizers positioned before the sink, in node order.
    pub fn weak_sanitizers(&self) -> impl Iterator<Item = &AppliedSanitizer> {
        self.effective_sanitizers(SanitizerStrength::Weak)
    }

    fn effective_sanitizers(
        &self,
        strength: SanitizerStrength,
    ) -> impl Iterator<Item = &AppliedSanitizer> {
        self.sanitizers
            .iter()
            .filter(move |s| s.strength == strength && s.is_before_sink())
    }

    /// The strong sanitizer this path is cited with: highest category rank,
    /// ties by node position.
    pub fn decisive_strong_sanitizer(&self) -> Option<&AppliedSanitizer> {
        self.strong_sanitizers().fold(None, |best, s| match best {
            None => Some(s),
            Some(b) => {
                let better = s.category.evidence_rank() > b.category.evidence_rank()
                    || (s.category.evidence_rank() == b.category.evidence_rank()
                        && s.position < b.position);
                Some(if better { s } else { b })
            }
        })
    }

    /// Number of distinct guard categories that count as layers.
    pub fn layer_count(&self) -> usize {
        self.guards
            .iter()
            .map(|g| g.category)
            .filter(GuardCategory::is_layer)
            .collect::<FxHashSet<_>>()
            .len()
    }

    pub fn is_defense_in_depth(&self) -> bool {
        self.layer_count() >= DEFENSE_IN_DEPTH_MIN_LAYERS
    }

    /// Guards of category Authentication or Authorization.
    pub fn access_control_guards(&self) -> impl Iterator<Item = &AppliedGuard> {
        self.guards.iter().filter(|g| g.category.is_access_control())
    }

    pub fn has_guards(&self) -> bool {
        !self.guards.is_empty()
    }

    /// File/line evidence for every node, in path order.
    pub fn evidence(&self) -> Vec<SourceLocation> {
        self.nodes.iter().map(|n| n.evidence.clone()).collect()
    }
}

/// Deserialized fields of a [`Path`], before validation.
#[derive(Deserialize)]
struct PathParts {
    id: String,
    nodes: Vec<Node>,
    #[serde(default)]
    liveness_flags: Vec<LivenessFlag>,
    #[serde(default)]
    sanitizers: Vec<AppliedSanitizer>,
    #[serde(default)]
    guards: Vec<AppliedGuard>,
    #[serde(default)]
    disqualifiers: Vec<String>,
}

impl TryFrom<PathParts> for Path {
    type Error = CorpusError;

    fn try_from(parts: PathParts) -> Result<Self, Self::Error> {
        Path::new(
            "<deserialized>",
            parts.id,
            parts.nodes,
            parts.liveness_flags,
            parts.sanitizers,
            parts.guards,
            parts.disqualifiers,
        )
    }
}

/// A path must be non-empty and contain exactly one sink, as its last node.
fn validate_shape(case_id: &str, path_id: &str, nodes: &[Node]) -> Result<(), CorpusError> {
    let Some(last) = nodes.last() else {
        return Err(CorpusError::EmptyPath {
            case_id: case_id.to_string(),
            path_id: path_id.to_string(),
        });
    };

    let sinks: Vec<&Node> = nodes.iter().filter(|n| n.is_sink()).collect();
    match sinks.as_slice() {
        [] => Err(CorpusError::MissingSink {
            case_id: case_id.to_string(),
            path_id: path_id.to_string(),
            location: last.evidence.clone(),
        }),
        [only] if only.is_sink() && std::ptr::eq(*only, last) => Ok(()),
        [only] => Err(CorpusError::SinkNotTerminal {
            case_id: case_id.to_string(),
            path_id: path_id.to_string(),
            location: only.evidence.clone(),
        }),
        [_, second, ..] => Err(CorpusError::MultipleSinks {
            case_id: case_id.to_string(),
            path_id: path_id.to_string(),
            count: sinks.len(),
            location: second.evidence.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeRole;

    fn node(role: NodeRole, identity: &str, line: u32) -> Node {
        Node::new(role, identity, SourceLocation::new("app.py", line))
    }

    fn guard(identity: &str, category: GuardCategory) -> AppliedGuard {
        AppliedGuard {
            node: node(NodeRole::Guard, identity, 1),
            category,
        }
    }

    #[test]
    fn rejects_path_without_sink() {
        let err = Path::new(
            "c",
            "p",
            vec![node(NodeRole::Entry, "handler", 1)],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, CorpusError::MissingSink { .. }));
    }

    #[test]
    fn rejects_non_terminal_sink() {
        let err = Path::new(
            "c",
            "p",
            vec![
                node(NodeRole::Sink, "cursor.execute", 2),
                node(NodeRole::Intermediate, "after", 3),
            ],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, CorpusError::SinkNotTerminal { .. }));
    }

    #[test]
    fn rejects_two_sinks_with_second_location() {
        let err = Path::new(
            "c",
            "p",
            vec![
                node(NodeRole::Sink, "first", 2),
                node(NodeRole::Sink, "second", 9),
            ],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        match err {
            CorpusError::MultipleSinks {
                count, location, ..
            } => {
                assert_eq!(count, 2);
                assert_eq!(location.line, 9);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn guards_dedupe_by_identity_and_layers_by_category() {
        let path = Path::new(
            "c",
            "p",
            vec![node(NodeRole::Entry, "h", 1), node(NodeRole::Sink, "s", 2)],
            vec![],
            vec![],
            vec![
                guard("login_required", GuardCategory::Authentication),
                guard("login_required", GuardCategory::Authentication),
                guard("session_check", GuardCategory::Authentication),
                guard("rate_limit", GuardCategory::RateLimit),
                guard("audit_hook", GuardCategory::Other),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(path.guards.len(), 4);
        assert_eq!(path.layer_count(), 2);
        assert!(!path.is_defense_in_depth());
    }

    #[test]
    fn deserialization_validates_shape() {
        let empty = r#"{"id":"p","nodes":[]}"#;
        let err = serde_json::from_str::<Path>(empty).unwrap_err();
        assert!(err.to_string().contains("has no nodes"), "{err}");

        let no_sink = r#"{"id":"p","nodes":[{"role":"entry","identity":"h","evidence":{"file":"app.py","line":1}}]}"#;
        assert!(serde_json::from_str::<Path>(no_sink).is_err());
    }

    #[test]
    fn deserialization_recomputes_liveness() {
        let path = Path::new(
            "c",
            "legacy",
            vec![node(NodeRole::Sink, "cursor.execute", 2)],
            vec![LivenessFlag::required("legacy_mode_enabled", false)],
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        assert!(!path.is_live());

        let mut json = serde_json::to_value(&path).unwrap();
        json["liveness"] = serde_json::json!({ "state": "LIVE" });
        let back: Path = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
        assert!(!back.is_live());
    }
}
