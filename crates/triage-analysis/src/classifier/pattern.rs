//! Sanitizer pattern metadata and regex anchoring checks.
//!
//! Metadata can only select techniques that the regex itself demonstrates:
//! a compiled regex, anchored at both ends for `fullmatch_regex`, or a deny
//! polarity. Claims of call-level techniques such as `parameterized_query`
//! are never taken from metadata; those identities must be registered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::SanitizerTechnique;

/// How the regex is applied to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Whole input must match (implicitly anchored at both ends).
    Fullmatch,
    /// Anchored at the start only.
    Match,
    /// Match anywhere.
    Search,
}

/// Whether a match accepts or rejects the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Allow,
    Deny,
}

/// Optional metadata attached to a sanitizer descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternMetadata {
    pub technique: Option<String>,
    pub regex: Option<String>,
    pub match_mode: Option<MatchMode>,
    pub polarity: Option<Polarity>,
}

/// Why metadata could not be turned into a technique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unrecognized {
    NoTechnique,
    UnknownTechnique(String),
    Unverifiable(String),
    MissingRegex,
    InvalidRegex(String),
}

impl fmt::Display for Unrecognized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTechnique => f.write_str("no technique declared"),
            Self::UnknownTechnique(name) => write!(f, "unknown technique '{name}'"),
            Self::Unverifiable(name) => {
                write!(f, "technique '{name}' cannot be verified from metadata")
            }
            Self::MissingRegex => f.write_str("regex technique without a regex"),
            Self::InvalidRegex(e) => write!(f, "invalid regex: {e}"),
        }
    }
}

impl PatternMetadata {
    /// Derive the technique this metadata supports, never upgrading a claim.
    pub fn technique(&self) -> Result<SanitizerTechnique, Unrecognized> {
        if self.polarity == Some(Polarity::Deny) {
            return Ok(SanitizerTechnique::DenylistSearch);
        }

        let name = self.technique.as_deref().ok_or(Unrecognized::NoTechnique)?;
        let declared = SanitizerTechnique::from_name(name)
            .ok_or_else(|| Unrecognized::UnknownTechnique(name.to_string()))?;

        match declared {
            SanitizerTechnique::FullmatchRegex | SanitizerTechnique::LooseRegex => {
                let pattern = self.regex.as_deref().ok_or(Unrecognized::MissingRegex)?;
                regex::Regex::new(pattern).map_err(|e| Unrecognized::InvalidRegex(e.to_string()))?;

                let mode = self.match_mode.unwrap_or(MatchMode::Search);
                if declared == SanitizerTechnique::FullmatchRegex && is_anchored(pattern, mode) {
                    Ok(SanitizerTechnique::FullmatchRegex)
                } else {
                    Ok(SanitizerTechnique::LooseRegex)
                }
            }
            other => Err(Unrecognized::Unverifiable(other.name().to_string())),
        }
    }
}

/// Whether `pattern`, applied with `mode`, must consume the entire input.
pub fn is_anchored(pattern: &str, mode: MatchMode) -> bool {
    if mode == MatchMode::Fullmatch {
        return true;
    }
    if has_top_level_alternation(pattern) {
        return false;
    }
    let start = mode == MatchMode::Match || pattern.starts_with('^') || pattern.starts_with("\\A");
    start && anchored_at_end(pattern)
}

fn anchored_at_end(pattern: &str) -> bool {
    if let Some(rest) = pattern.strip_suffix("\\z") {
        return !escapes_next(rest);
    }
    if let Some(rest) = pattern.strip_suffix('$') {
        return !escapes_next(rest);
    }
    false
}

/// An odd run of trailing backslashes escapes whatever follows.
fn escapes_next(s: &str) -> bool {
    s.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// `^a|b$` anchors only one branch.
fn has_top_level_alternation(pattern: &str) -> bool {
    let mut depth = 0usize;
    let mut in_class = false;
    let mut escaped = false;
    for c in pattern.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => depth = depth.saturating_sub(1),
            '|' if !in_class && depth == 0 => return true,
            _ => {}
        }
    }
    false
}
