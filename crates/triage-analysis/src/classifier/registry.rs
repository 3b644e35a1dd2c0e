//! Table-driven sanitizer/guard classification.

use std::path::Path as FsPath;

use serde::Deserialize;
use triage_core::constants::REGISTRY_VERSION;
use triage_core::errors::CorpusError;
use triage_core::types::collections::FxHashMap;

use super::builtin::{technique_tier, BUILTIN_GUARDS, BUILTIN_SANITIZERS};
use super::pattern::PatternMetadata;
use crate::model::{GuardCategory, Node, SanitizerCategory, SanitizerStrength, SanitizerTechnique};

/// Outcome of classifying one sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SanitizerClass {
    pub strength: SanitizerStrength,
    pub category: SanitizerCategory,
    pub technique: Option<SanitizerTechnique>,
}

impl SanitizerClass {
    /// Strength NONE, category Other: flows through the resolver as if absent.
    pub const UNRECOGNIZED: Self = Self {
        strength: SanitizerStrength::None,
        category: SanitizerCategory::Other,
        technique: None,
    };

    fn from_technique(technique: SanitizerTechnique) -> Self {
        let (strength, category) = technique_tier(technique);
        Self {
            strength,
            category,
            technique: Some(technique),
        }
    }
}

/// Closed, versioned registry of known sanitizer and guard identities.
///
/// Lookup is exact on identity. Nothing is inferred from an identity's
/// spelling: an unregistered identity is NONE/Other unless its pattern
/// metadata carries a regex that demonstrates the claimed technique.
#[derive(Debug, Clone)]
pub struct ClassifierRegistry {
    version: u32,
    sanitizers: FxHashMap<String, SanitizerTechnique>,
    guards: FxHashMap<String, GuardCategory>,
    extensions: usize,
}

/// TOML shape accepted by [`ClassifierRegistry::extend_from_toml`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryExtensionFile {
    #[serde(default)]
    sanitizer: Vec<SanitizerEntry>,
    #[serde(default)]
    guard: Vec<GuardEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SanitizerEntry {
    identity: String,
    technique: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GuardEntry {
    identity: String,
    category: String,
}

impl ClassifierRegistry {
    /// Registry with no entries. Every identity classifies as unrecognized.
    pub fn empty() -> Self {
        Self {
            version: REGISTRY_VERSION,
            sanitizers: FxHashMap::default(),
            guards: FxHashMap::default(),
            extensions: 0,
        }
    }

    /// Registry populated with the built-in tables.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (identity, technique) in BUILTIN_SANITIZERS {
            registry.sanitizers.insert(identity.to_string(), *technique);
        }
        for (identity, category) in BUILTIN_GUARDS {
            registry.guards.insert(identity.to_string(), *category);
        }
        registry
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Number of entries added on top of the built-in tables.
    pub fn extensions(&self) -> usize {
        self.extensions
    }

    pub fn sanitizer_count(&self) -> usize {
        self.sanitizers.len()
    }

    pub fn guard_count(&self) -> usize {
        self.guards.len()
    }

    /// Classify a sanitizer node.
    ///
    /// A registered identity always wins over metadata.
    pub fn classify_sanitizer(
        &self,
        node: &Node,
        pattern: Option<&PatternMetadata>,
    ) -> SanitizerClass {
        if let Some(technique) = self.sanitizers.get(&node.identity) {
            return SanitizerClass::from_technique(*technique);
        }

        let Some(pattern) = pattern else {
            tracing::debug!(identity = %node.identity, evidence = %node.evidence, "unregistered sanitizer");
            return SanitizerClass::UNRECOGNIZED;
        };

        match pattern.technique() {
            Ok(technique) => SanitizerClass::from_technique(technique),
            Err(reason) => {
                tracing::debug!(
                    identity = %node.identity,
                    evidence = %node.evidence,
                    %reason,
                    "sanitizer metadata not recognized"
                );
                SanitizerClass::UNRECOGNIZED
            }
        }
    }

    /// Classify a guard node. `declared` is the category the corpus claims;
    /// it is never trusted over the registry.
    pub fn classify_guard(&self, node: &Node, declared: Option<GuardCategory>) -> GuardCategory {
        let category = self
            .guards
            .get(&node.identity)
            .copied()
            .unwrap_or(GuardCategory::Other);

        match declared {
            Some(claimed) if claimed != category => {
                tracing::warn!(
                    identity = %node.identity,
                    evidence = %node.evidence,
                    claimed = %claimed,
                    registered = %category,
                    "declared guard category ignored"
                );
            }
            None if category == GuardCategory::Other => {
                tracing::debug!(identity = %node.identity, evidence = %node.evidence, "unregistered guard");
            }
            _ => {}
        }
        category
    }

    pub fn register_sanitizer(&mut self, identity: impl Into<String>, technique: SanitizerTechnique) {
        self.sanitizers.insert(identity.into(), technique);
        self.extensions += 1;
    }

    pub fn register_guard(&mut self, identity: impl Into<String>, category: GuardCategory) {
        self.guards.insert(identity.into(), category);
        self.extensions += 1;
    }

    /// Merge `[[sanitizer]]` and `[[guard]]` tables. Returns the number of
    /// entries added. Nothing is merged if any entry is invalid.
    pub fn extend_from_toml(&mut self, toml_str: &str) -> Result<usize, CorpusError> {
        self.extend_from_source("<string>", toml_str)
    }

    /// Merge a registry extension file.
    pub fn extend_from_file(&mut self, path: &FsPath) -> Result<usize, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|e| CorpusError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.extend_from_source(&path.display().to_string(), &content)
    }

    fn extend_from_source(&mut self, source: &str, toml_str: &str) -> Result<usize, CorpusError> {
        let invalid = |message: String| CorpusError::InvalidRegistry {
            path: source.to_string(),
            message,
        };

        let file: RegistryExtensionFile =
            toml::from_str(toml_str).map_err(|e| invalid(e.to_string()))?;

        let mut sanitizers = Vec::with_capacity(file.sanitizer.len());
        for entry in file.sanitizer {
            let technique = SanitizerTechnique::from_name(&entry.technique).ok_or_else(|| {
                invalid(format!(
                    "unknown technique '{}' for sanitizer '{}'",
                    entry.technique, entry.identity
                ))
            })?;
            sanitizers.push((entry.identity, technique));
        }

        let mut guards = Vec::with_capacity(file.guard.len());
        for entry in file.guard {
            let category = GuardCategory::from_name(&entry.category);
            if category == GuardCategory::Other {
                return Err(invalid(format!(
                    "guard '{}' must name a layer category, got '{}'",
                    entry.identity, entry.category
                )));
            }
            guards.push((entry.identity, category));
        }

        let added = sanitizers.len() + guards.len();
        for (identity, technique) in sanitizers {
            self.register_sanitizer(identity, technique);
        }
        for (identity, category) in guards {
            self.register_guard(identity, category);
        }
        tracing::info!(source, added, "registry extended");
        Ok(added)
    }

    /// Sanitizer table sorted by identity.
    pub fn sanitizer_entries(&self) -> Vec<(&str, SanitizerTechnique)> {
        let mut entries: Vec<_> = self
            .sanitizers
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Guard table sorted by identity.
    pub fn guard_entries(&self) -> Vec<(&str, GuardCategory)> {
        let mut entries: Vec<_> = self.guards.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Default for ClassifierRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
