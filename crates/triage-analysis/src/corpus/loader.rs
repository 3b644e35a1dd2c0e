//! Corpus loading: descriptors → validated, classified, immutable cases.

use std::path::Path as FsPath;

use serde::Serialize;
use triage_core::errors::{CorpusError, TriageErrorCode};
use triage_core::types::collections::FxHashSet;

use super::descriptor::{
    optional_location, raw_case_id, raw_entry_location, CaseDescriptor, CorpusFile,
    PathDescriptor,
};
use crate::classifier::ClassifierRegistry;
use crate::model::{
    AppliedGuard, AppliedSanitizer, EntryDescriptor, LivenessFlag, Node, NodeRole, Path,
    SourceLocation, VulnerabilityCase,
};

/// A case excluded from the run, reported apart from any verdict.
#[derive(Debug, Clone, Serialize)]
pub struct CaseRejection {
    pub case_id: String,
    pub code: &'static str,
    pub message: String,
    pub location: Option<SourceLocation>,
    #[serde(skip)]
    pub error: CorpusError,
}

impl CaseRejection {
    fn new(case_id: impl Into<String>, error: CorpusError) -> Self {
        Self {
            case_id: case_id.into(),
            code: error.error_code(),
            message: error.to_string(),
            location: error.location().cloned(),
            error,
        }
    }
}

/// The immutable set of cases for one run.
#[derive(Debug, Clone)]
pub struct Corpus {
    source: String,
    application: Option<String>,
    cases: Vec<VulnerabilityCase>,
    rejections: Vec<CaseRejection>,
}

impl Corpus {
    /// Read and build a corpus file.
    pub fn load(path: &FsPath, registry: &ClassifierRegistry) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|e| CorpusError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content, &path.display().to_string(), registry)
    }

    /// Build a corpus from TOML text. TOML syntax errors and a malformed
    /// file header abort; a malformed or structurally invalid case rejects
    /// only that case.
    pub fn from_toml_str(
        toml_str: &str,
        source: &str,
        registry: &ClassifierRegistry,
    ) -> Result<Self, CorpusError> {
        let file: CorpusFile = toml::from_str(toml_str).map_err(|e| CorpusError::Parse {
            path: source.to_string(),
            message: e.to_string(),
        })?;

        let mut cases = Vec::with_capacity(file.cases.len());
        let mut rejections = Vec::new();
        let mut seen = FxHashSet::default();

        for (index, raw) in file.cases.into_iter().enumerate() {
            let descriptor: CaseDescriptor = match raw.clone().try_into() {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    let case_id = raw_case_id(&raw, index);
                    seen.insert(case_id.clone());
                    let error = CorpusError::InvalidCase {
                        case_id: case_id.clone(),
                        message: e.message().to_string(),
                        location: raw_entry_location(&raw),
                    };
                    reject(&mut rejections, &case_id, error);
                    continue;
                }
            };

            if !seen.insert(descriptor.id.clone()) {
                let error = CorpusError::DuplicateCaseId {
                    case_id: descriptor.id.clone(),
                    location: descriptor.entry.location(),
                };
                reject(&mut rejections, &descriptor.id, error);
                continue;
            }

            let case_id = descriptor.id.clone();
            match build_case(descriptor, registry) {
                Ok(case) => cases.push(case),
                Err(error) => reject(&mut rejections, &case_id, error),
            }
        }

        tracing::info!(
            source,
            cases = cases.len(),
            rejected = rejections.len(),
            "corpus loaded"
        );

        Ok(Self {
            source: source.to_string(),
            application: file.application,
            cases,
            rejections,
        })
    }

    /// Wrap already-built cases. Used by tests and benches.
    pub fn from_cases(cases: Vec<VulnerabilityCase>) -> Self {
        Self {
            source: "<memory>".to_string(),
            application: None,
            cases,
            rejections: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn application(&self) -> Option<&str> {
        self.application.as_deref()
    }

    /// Accepted cases, in declaration order.
    pub fn cases(&self) -> &[VulnerabilityCase] {
        &self.cases
    }

    pub fn rejections(&self) -> &[CaseRejection] {
        &self.rejections
    }

    pub fn get(&self, id: &str) -> Option<&VulnerabilityCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

fn reject(rejections: &mut Vec<CaseRejection>, case_id: &str, error: CorpusError) {
    tracing::warn!(case_id, error = %error, "case rejected");
    rejections.push(CaseRejection::new(case_id, error));
}

fn build_case(
    descriptor: CaseDescriptor,
    registry: &ClassifierRegistry,
) -> Result<VulnerabilityCase, CorpusError> {
    let entry_location = descriptor.entry.location();
    let paths = descriptor
        .paths
        .into_iter()
        .map(|p| build_path(&descriptor.id, p, &entry_location, registry))
        .collect::<Result<Vec<_>, _>>()?;

    let entry = EntryDescriptor {
        handler: descriptor.entry.handler,
        route: descriptor.entry.route,
        location: entry_location,
    };
    VulnerabilityCase::new(descriptor.id, descriptor.sink, entry, paths, descriptor.expected)
}

/// Attach sanitizers and guards to the node sequence and classify them.
///
/// A sanitizer or guard descriptor matches the first node of the same role
/// and identity; that node supplies the evidence and, for sanitizers, the
/// position before the sink. Unmatched descriptors fall back to their own
/// file/line, then to the entry location.
fn build_path(
    case_id: &str,
    descriptor: PathDescriptor,
    entry_location: &SourceLocation,
    registry: &ClassifierRegistry,
) -> Result<Path, CorpusError> {
    let nodes: Vec<Node> = descriptor
        .nodes
        .into_iter()
        .map(|n| Node::new(n.role, n.identity, SourceLocation::new(n.file, n.line)))
        .collect();

    let find = |role: NodeRole, identity: &str| {
        nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.role == role && n.identity == identity)
    };

    let sanitizers = descriptor
        .sanitizers
        .into_iter()
        .map(|s| {
            let (node, position) = match find(NodeRole::Sanitizer, &s.identity) {
                Some((i, n)) => (n.clone(), Some(i)),
                None => {
                    let evidence = optional_location(&s.file, s.line)
                        .unwrap_or_else(|| entry_location.clone());
                    tracing::debug!(case_id, identity = %s.identity, "sanitizer not on node sequence");
                    (Node::new(NodeRole::Sanitizer, s.identity, evidence), None)
                }
            };
            let class = registry.classify_sanitizer(&node, s.pattern.as_ref());
            AppliedSanitizer {
                node,
                strength: class.strength,
                category: class.category,
                technique: class.technique,
                position,
            }
        })
        .collect();

    let guards = descriptor
        .guards
        .into_iter()
        .map(|g| {
            let node = match find(NodeRole::Guard, &g.identity) {
                Some((_, n)) => n.clone(),
                None => {
                    let evidence = optional_location(&g.file, g.line)
                        .unwrap_or_else(|| entry_location.clone());
                    Node::new(NodeRole::Guard, g.identity, evidence)
                }
            };
            let category = registry.classify_guard(&node, g.category);
            AppliedGuard { node, category }
        })
        .collect();

    let flags = descriptor
        .liveness
        .into_iter()
        .map(|f| LivenessFlag {
            evidence: optional_location(&f.file, f.line),
            condition: f.condition,
            value: f.value,
            taken_when: f.taken_when,
        })
        .collect();

    Path::new(
        case_id,
        descriptor.id,
        nodes,
        flags,
        sanitizers,
        guards,
        descriptor.disqualifiers,
    )
}
