//! Verdict report configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REPORT_FORMAT, REPORT_FORMATS};
use crate::errors::ConfigError;

/// Configuration for report emission.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: `json` or `pretty`. Default: `json`.
    pub format: Option<String>,
    /// Output file. Default: stdout.
    pub output: Option<PathBuf>,
    /// Include rejected cases in the report. Default: true.
    pub include_rejections: Option<bool>,
}

impl ReportConfig {
    /// Returns the effective report format.
    pub fn effective_format(&self) -> Result<ReportFormat, ConfigError> {
        self.format
            .as_deref()
            .unwrap_or(DEFAULT_REPORT_FORMAT)
            .parse()
    }

    /// Returns whether rejections are emitted, defaulting to true.
    pub fn effective_include_rejections(&self) -> bool {
        self.include_rejections.unwrap_or(true)
    }
}

/// Report serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Compact single-line JSON.
    Json,
    /// Indented JSON.
    Pretty,
}

impl ReportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(ConfigError::InvalidValue {
                field: "report.format".to_string(),
                message: format!("'{other}' is not one of {REPORT_FORMATS:?}"),
            }),
        }
    }
}
