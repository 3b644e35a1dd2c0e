//! Core model types: sink kinds, node roles, nodes, protection tiers.

use std::fmt;

use serde::{Deserialize, Serialize};
pub use triage_core::errors::SourceLocation;

/// Kind of sink a case reports. Built-in kinds map to a CWE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Raw SQL execution (CWE-89).
    SqlInjection,
    /// Server-side template rendering of tainted source (CWE-1336).
    TemplateInjection,
    /// OS command execution (CWE-78).
    CommandInjection,
    /// Unescaped HTML output (CWE-79).
    CrossSiteScripting,
    /// File path built from input (CWE-22).
    PathTraversal,
    /// Any other sink, identified by its CWE.
    Custom(u32),
}

impl SinkKind {
    /// Get the CWE ID for this sink kind.
    pub fn cwe_id(&self) -> u32 {
        match self {
            Self::SqlInjection => 89,
            Self::TemplateInjection => 1336,
            Self::CommandInjection => 78,
            Self::CrossSiteScripting => 79,
            Self::PathTraversal => 22,
            Self::Custom(id) => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SqlInjection => "sql_injection",
            Self::TemplateInjection => "template_injection",
            Self::CommandInjection => "command_injection",
            Self::CrossSiteScripting => "cross_site_scripting",
            Self::PathTraversal => "path_traversal",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a step within a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Where externally controlled data enters (the source).
    Entry,
    /// Plain propagation step.
    Intermediate,
    /// Transformation or validation that may neutralize taint.
    Sanitizer,
    /// Access-control or rate-limiting check.
    Guard,
    /// The terminal operation where tainted data causes harm.
    Sink,
}

impl NodeRole {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Intermediate => "intermediate",
            Self::Sanitizer => "sanitizer",
            Self::Guard => "guard",
            Self::Sink => "sink",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed step in a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub role: NodeRole,
    /// Function or step name, e.g. `DatabaseHelper.execute_raw_query`.
    pub identity: String,
    pub evidence: SourceLocation,
}

impl Node {
    pub fn new(role: NodeRole, identity: impl Into<String>, evidence: SourceLocation) -> Self {
        Self {
            role,
            identity: identity.into(),
            evidence,
        }
    }

    pub fn is_sink(&self) -> bool {
        self.role == NodeRole::Sink
    }
}

/// How much a sanitizer can be trusted to neutralize taint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SanitizerStrength {
    /// Unrecognized or ineffective; flows through the resolver as if absent.
    None,
    /// Bypassable (denylists, loosely anchored patterns).
    Weak,
    /// Neutralizes taint for the sink it guards.
    Strong,
}

impl SanitizerStrength {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Weak => "WEAK",
            Self::Strong => "STRONG",
        }
    }
}

impl fmt::Display for SanitizerStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What kind of neutralization a sanitizer performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanitizerCategory {
    /// Parameterized queries and output escaping (2A).
    ParameterizationOrEscaping,
    /// Full-input allowlist validation (2B).
    ValidationAllowlist,
    /// Query builders and ORM constructions (2C).
    ArchitecturalOrm,
    /// Unrecognized, or recognized but not sanitized-tier.
    Other,
}

impl SanitizerCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParameterizationOrEscaping => "parameterization_or_escaping",
            Self::ValidationAllowlist => "validation_allowlist",
            Self::ArchitecturalOrm => "architectural_orm",
            Self::Other => "other",
        }
    }

    /// The sanitized-variant subcategory this category is cited as.
    pub fn subcategory(&self) -> Option<super::Subcategory> {
        use super::Subcategory;
        match self {
            Self::ParameterizationOrEscaping => Some(Subcategory::Sanitized2A),
            Self::ValidationAllowlist => Some(Subcategory::Sanitized2B),
            Self::ArchitecturalOrm => Some(Subcategory::Sanitized2C),
            Self::Other => None,
        }
    }

    /// Evidence rank when several strong sanitizers compete (higher wins).
    /// Structural guarantees outrank escaping, which outranks input validation.
    pub fn evidence_rank(&self) -> u8 {
        match self {
            Self::ArchitecturalOrm => 3,
            Self::ParameterizationOrEscaping => 2,
            Self::ValidationAllowlist => 1,
            Self::Other => 0,
        }
    }
}

impl fmt::Display for SanitizerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of an access-control or abuse-prevention guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardCategory {
    Authentication,
    Authorization,
    RateLimit,
    Csrf,
    Other,
}

impl GuardCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::RateLimit => "rate_limit",
            Self::Csrf => "csrf",
            Self::Other => "other",
        }
    }

    /// Authentication or authorization: the guards that alone justify 3A.
    pub fn is_access_control(&self) -> bool {
        matches!(self, Self::Authentication | Self::Authorization)
    }

    /// Whether the category counts as a defense-in-depth layer.
    pub fn is_layer(&self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Parse a declared category name. Unknown names map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "authentication" | "authn" => Self::Authentication,
            "authorization" | "authz" => Self::Authorization,
            "rate_limit" | "ratelimit" => Self::RateLimit,
            "csrf" => Self::Csrf,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for GuardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A constant condition controlling whether a path is taken.
///
/// The path is taken only if the condition evaluates to `taken_when`.
/// `value` is the constant the condition folds to at corpus-construction
/// time (a deprecated feature flag fixed to false, an unregistered route).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LivenessFlag {
    pub condition: String,
    pub value: bool,
    pub taken_when: bool,
    pub evidence: Option<SourceLocation>,
}

impl LivenessFlag {
    /// A flag that must be true for the path to be taken.
    pub fn required(condition: impl Into<String>, value: bool) -> Self {
        Self {
            condition: condition.into(),
            value,
            taken_when: true,
            evidence: None,
        }
    }

    /// Whether this flag's folded value routes execution onto the path.
    pub fn is_consistent(&self) -> bool {
        self.value == self.taken_when
    }
}

/// Registered sanitization techniques. Each maps to one strength/category tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanitizerTechnique {
    /// Bound query parameters (`cursor.execute(query, params)`).
    ParameterizedQuery,
    /// Context-aware output escaping (`html.escape`).
    OutputEscaping,
    /// Regex required to match the entire input.
    FullmatchRegex,
    /// Membership in a fixed set of allowed values.
    AllowlistMembership,
    /// Query constructed by a builder or ORM from allowlisted fields.
    QueryBuilder,
    /// Regex that may match a prefix or substring of the input.
    LooseRegex,
    /// Rejects input matching known-bad patterns.
    DenylistSearch,
    /// Removes known-bad characters or markers.
    CharacterStripping,
}

impl SanitizerTechnique {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParameterizedQuery => "parameterized_query",
            Self::OutputEscaping => "output_escaping",
            Self::FullmatchRegex => "fullmatch_regex",
            Self::AllowlistMembership => "allowlist_membership",
            Self::QueryBuilder => "query_builder",
            Self::LooseRegex => "loose_regex",
            Self::DenylistSearch => "denylist_search",
            Self::CharacterStripping => "character_stripping",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.name() == name)
    }

    pub fn all() -> &'static [SanitizerTechnique] {
        &[
            Self::ParameterizedQuery,
            Self::OutputEscaping,
            Self::FullmatchRegex,
            Self::AllowlistMembership,
            Self::QueryBuilder,
            Self::LooseRegex,
            Self::DenylistSearch,
            Self::CharacterStripping,
        ]
    }
}

impl fmt::Display for SanitizerTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
