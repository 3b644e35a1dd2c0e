//! Serde shape of the corpus description file.
//!
//! ```toml
//! [[case]]
//! id = "app-search-transactions"
//! sink = "sql_injection"
//! entry = { handler = "search_transactions", route = "GET /api/search", file = "app.py", line = 67 }
//! expected = { verdict = "MUST_FIX" }
//!
//! [[case.path]]
//! id = "direct"
//! nodes = [
//!     { role = "entry", identity = "search_transactions", file = "app.py", line = 73 },
//!     { role = "sink", identity = "cursor.execute", file = "services/database_service.py", line = 50 },
//! ]
//! ```

use serde::Deserialize;

use crate::classifier::PatternMetadata;
use crate::model::{Expectation, GuardCategory, NodeRole, SinkKind, SourceLocation};

/// File header. Cases stay raw so that each one is checked against
/// [`CaseDescriptor`] on its own.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusFile {
    /// Free-form name of the analyzed application.
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default, rename = "case")]
    pub cases: Vec<toml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseDescriptor {
    pub id: String,
    pub sink: SinkKind,
    pub entry: EntryDescriptorDef,
    #[serde(default)]
    pub expected: Option<Expectation>,
    #[serde(default, rename = "path")]
    pub paths: Vec<PathDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryDescriptorDef {
    pub handler: String,
    #[serde(default)]
    pub route: Option<String>,
    pub file: String,
    pub line: u32,
}

impl EntryDescriptorDef {
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(&self.file, self.line)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathDescriptor {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub liveness: Vec<LivenessDescriptor>,
    #[serde(default)]
    pub sanitizers: Vec<SanitizerDescriptor>,
    #[serde(default)]
    pub guards: Vec<GuardDescriptor>,
    #[serde(default)]
    pub disqualifiers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDescriptor {
    pub role: NodeRole,
    pub identity: String,
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LivenessDescriptor {
    pub condition: String,
    pub value: bool,
    #[serde(default = "default_taken_when")]
    pub taken_when: bool,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

fn default_taken_when() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SanitizerDescriptor {
    pub identity: String,
    #[serde(default)]
    pub pattern: Option<PatternMetadata>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardDescriptor {
    pub identity: String,
    #[serde(default)]
    pub category: Option<GuardCategory>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// Case id of a raw `[[case]]` table, or its 1-based position when the id is
/// missing or not a string.
pub fn raw_case_id(raw: &toml::Value, index: usize) -> String {
    raw.get("id")
        .and_then(toml::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("case#{}", index + 1))
}

/// Entry location of a raw `[[case]]` table, if it is well-formed enough.
pub fn raw_entry_location(raw: &toml::Value) -> Option<SourceLocation> {
    let entry = raw.get("entry")?;
    let file = entry.get("file")?.as_str()?;
    let line = u32::try_from(entry.get("line")?.as_integer()?).ok()?;
    Some(SourceLocation::new(file, line))
}

/// `file` + `line` when both are given.
pub fn optional_location(file: &Option<String>, line: Option<u32>) -> Option<SourceLocation> {
    match (file, line) {
        (Some(file), Some(line)) => Some(SourceLocation::new(file, line)),
        _ => None,
    }
}
