//! Verdict kinds: per-path verdicts, case verdicts, subcategories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal state of a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathVerdict {
    DeadCode,
    Exploitable,
    SafeSanitized,
    SafeProtected,
}

impl PathVerdict {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeadCode => "DEAD_CODE",
            Self::Exploitable => "EXPLOITABLE",
            Self::SafeSanitized => "SAFE_SANITIZED",
            Self::SafeProtected => "SAFE_PROTECTED",
        }
    }

    pub fn is_live(&self) -> bool {
        !matches!(self, Self::DeadCode)
    }
}

impl fmt::Display for PathVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The single verdict graded for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseVerdict {
    MustFix,
    GoodToFix,
    FalsePositiveSanitized,
    FalsePositiveProtected,
    FalsePositiveDeadCode,
    FalsePositive,
}

impl CaseVerdict {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MustFix => "MUST_FIX",
            Self::GoodToFix => "GOOD_TO_FIX",
            Self::FalsePositiveSanitized => "FALSE_POSITIVE_SANITIZED",
            Self::FalsePositiveProtected => "FALSE_POSITIVE_PROTECTED",
            Self::FalsePositiveDeadCode => "FALSE_POSITIVE_DEAD_CODE",
            Self::FalsePositive => "FALSE_POSITIVE",
        }
    }

    /// True positives: the finding should be fixed.
    pub fn is_true_positive(&self) -> bool {
        matches!(self, Self::MustFix | Self::GoodToFix)
    }

    pub fn all() -> &'static [CaseVerdict] {
        &[
            Self::MustFix,
            Self::GoodToFix,
            Self::FalsePositiveSanitized,
            Self::FalsePositiveProtected,
            Self::FalsePositiveDeadCode,
            Self::FalsePositive,
        ]
    }
}

impl fmt::Display for CaseVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CaseVerdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|v| v.name() == normalized)
            .ok_or_else(|| format!("unknown case verdict '{s}'"))
    }
}

/// Finer evidence tag cited with a false-positive verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subcategory {
    /// Parameterization or output escaping.
    #[serde(rename = "2A")]
    Sanitized2A,
    /// Full-input allowlist validation.
    #[serde(rename = "2B")]
    Sanitized2B,
    /// Query builder / ORM construction.
    #[serde(rename = "2C")]
    Sanitized2C,
    /// Single strong authentication/authorization guard.
    #[serde(rename = "3A")]
    Protected3A,
    /// Defense-in-depth: three or more guard categories.
    #[serde(rename = "3B")]
    Protected3B,
}

impl Subcategory {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sanitized2A => "2A",
            Self::Sanitized2B => "2B",
            Self::Sanitized2C => "2C",
            Self::Protected3A => "3A",
            Self::Protected3B => "3B",
        }
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Subcategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "2A" => Ok(Self::Sanitized2A),
            "2B" => Ok(Self::Sanitized2B),
            "2C" => Ok(Self::Sanitized2C),
            "3A" => Ok(Self::Protected3A),
            "3B" => Ok(Self::Protected3B),
            _ => Err(format!("unknown subcategory '{s}'")),
        }
    }
}
