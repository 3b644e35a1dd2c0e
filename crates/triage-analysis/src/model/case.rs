//! Vulnerability cases: one reported sink occurrence and its candidate paths.

use serde::{Deserialize, Serialize};
use triage_core::errors::CorpusError;
use triage_core::types::collections::FxHashSet;

use super::path::Path;
use super::types::{SinkKind, SourceLocation};
use super::verdict::{CaseVerdict, Subcategory};

/// The request handler a case is reported against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryDescriptor {
    /// Handler name, e.g. `account_controller.search_accounts`.
    pub handler: String,
    /// HTTP method and route, when the handler is routed at all.
    pub route: Option<String>,
    pub location: SourceLocation,
}

/// Ground-truth verdict narrated for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expectation {
    pub verdict: CaseVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Subcategory>,
}

/// A sink occurrence owning one or more paths. The unit of grading.
///
/// Built by [`VulnerabilityCase::new`]; deserialization goes through it too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CaseParts")]
pub struct VulnerabilityCase {
    pub id: String,
    pub sink_kind: SinkKind,
    pub entry: EntryDescriptor,
    pub paths: Vec<Path>,
    pub expected: Option<Expectation>,
}

impl VulnerabilityCase {
    /// Build a case. Rejects an empty path set and duplicate path ids.
    pub fn new(
        id: impl Into<String>,
        sink_kind: SinkKind,
        entry: EntryDescriptor,
        paths: Vec<Path>,
        expected: Option<Expectation>,
    ) -> Result<Self, CorpusError> {
        let id = id.into();
        if paths.is_empty() {
            return Err(CorpusError::EmptyCase {
                case_id: id,
                location: entry.location,
            });
        }

        let mut seen = FxHashSet::default();
        for path in &paths {
            if !seen.insert(path.id.as_str()) {
                return Err(CorpusError::DuplicatePathId {
                    case_id: id,
                    path_id: path.id.clone(),
                });
            }
        }

        Ok(Self {
            id,
            sink_kind,
            entry,
            paths,
            expected,
        })
    }

    /// Whether any path in the case carries a guard.
    pub fn has_guards(&self) -> bool {
        self.paths.iter().any(Path::has_guards)
    }

    pub fn path(&self, id: &str) -> Option<&Path> {
        self.paths.iter().find(|p| p.id == id)
    }
}

#[derive(Deserialize)]
struct CaseParts {
    id: String,
    sink_kind: SinkKind,
    entry: EntryDescriptor,
    paths: Vec<Path>,
    #[serde(default)]
    expected: Option<Expectation>,
}

impl TryFrom<CaseParts> for VulnerabilityCase {
    type Error = CorpusError;

    fn try_from(parts: CaseParts) -> Result<Self, Self::Error> {
        VulnerabilityCase::new(parts.id, parts.sink_kind, parts.entry, parts.paths, parts.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeRole};

    fn entry() -> EntryDescriptor {
        EntryDescriptor {
            handler: "search".to_string(),
            route: Some("GET /api/search".to_string()),
            location: SourceLocation::new("app.py", 40),
        }
    }

    fn path(id: &str) -> Path {
        Path::new(
            "case",
            id,
            vec![Node::new(
                NodeRole::Sink,
                "cursor.execute",
                SourceLocation::new("app.py", 52),
            )],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn zero_paths_is_a_construction_error() {
        let err =
            VulnerabilityCase::new("case", SinkKind::SqlInjection, entry(), vec![], None)
                .unwrap_err();
        match err {
            CorpusError::EmptyCase { case_id, location } => {
                assert_eq!(case_id, "case");
                assert_eq!(location.line, 40);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn duplicate_path_ids_are_rejected() {
        let err = VulnerabilityCase::new(
            "case",
            SinkKind::SqlInjection,
            entry(),
            vec![path("p1"), path("p1")],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CorpusError::DuplicatePathId { .. }));
    }

    #[test]
    fn lookup_by_path_id() {
        let case = VulnerabilityCase::new(
            "case",
            SinkKind::SqlInjection,
            entry(),
            vec![path("p1"), path("p2")],
            None,
        )
        .unwrap();
        assert!(case.path("p2").is_some());
        assert!(case.path("p3").is_none());
        assert!(!case.has_guards());
    }

    #[test]
    fn deserialization_goes_through_constructor() {
        let case = VulnerabilityCase::new(
            "case",
            SinkKind::SqlInjection,
            entry(),
            vec![path("p1")],
            None,
        )
        .unwrap();
        let json = serde_json::to_string(&case).unwrap();
        let back: VulnerabilityCase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, case);

        let mut no_paths = serde_json::to_value(&case).unwrap();
        no_paths["paths"] = serde_json::json!([]);
        let err = serde_json::from_value::<VulnerabilityCase>(no_paths).unwrap_err();
        assert!(err.to_string().contains("declares no paths"), "{err}");

        let mut empty_nodes = serde_json::to_value(&case).unwrap();
        empty_nodes["paths"][0]["nodes"] = serde_json::json!([]);
        assert!(serde_json::from_value::<VulnerabilityCase>(empty_nodes).is_err());
    }
}
