//! Top-level triage configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ClassifyConfig, CorpusConfig, ReportConfig};
use crate::constants::{MAX_THREADS, PROJECT_CONFIG_FILE};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`TRIAGE_*`)
/// 3. Project config (`triage.toml` in project root)
/// 4. User config (`~/.triage/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TriageConfig {
    pub corpus: CorpusConfig,
    pub classify: ClassifyConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub corpus_path: Option<PathBuf>,
    pub registry_path: Option<PathBuf>,
    pub threads: Option<usize>,
    pub parallel: Option<bool>,
    pub report_format: Option<String>,
    pub report_output: Option<PathBuf>,
}

impl TriageConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &TriageConfig) -> Result<(), ConfigError> {
        if let Some(threads) = config.classify.threads {
            if threads > MAX_THREADS {
                return Err(ConfigError::ValidationFailed {
                    field: "classify.threads".to_string(),
                    message: format!("must be at most {MAX_THREADS}"),
                });
            }
        }
        if let Err(ConfigError::InvalidValue { message, .. }) = config.report.effective_format() {
            return Err(ConfigError::ValidationFailed {
                field: "report.format".to_string(),
                message,
            });
        }
        if let Some(ref path) = config.corpus.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "corpus.path".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.triage/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut TriageConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: TriageConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut TriageConfig, other: &TriageConfig) {
        // Corpus
        if other.corpus.path.is_some() {
            base.corpus.path = other.corpus.path.clone();
        }
        if other.corpus.registry_path.is_some() {
            base.corpus.registry_path = other.corpus.registry_path.clone();
        }

        // Classify
        if other.classify.threads.is_some() {
            base.classify.threads = other.classify.threads;
        }
        if other.classify.parallel.is_some() {
            base.classify.parallel = other.classify.parallel;
        }

        // Report
        if other.report.format.is_some() {
            base.report.format = other.report.format.clone();
        }
        if other.report.output.is_some() {
            base.report.output = other.report.output.clone();
        }
        if other.report.include_rejections.is_some() {
            base.report.include_rejections = other.report.include_rejections;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `TRIAGE_CORPUS_PATH`, `TRIAGE_THREADS`, etc.
    fn apply_env_overrides(config: &mut TriageConfig) {
        if let Ok(val) = std::env::var("TRIAGE_CORPUS_PATH") {
            config.corpus.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("TRIAGE_REGISTRY_PATH") {
            config.corpus.registry_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("TRIAGE_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.classify.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("TRIAGE_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.classify.parallel = Some(v);
            }
        }
        if let Ok(val) = std::env::var("TRIAGE_REPORT_FORMAT") {
            config.report.format = Some(val);
        }
        if let Ok(val) = std::env::var("TRIAGE_REPORT_OUTPUT") {
            config.report.output = Some(PathBuf::from(val));
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut TriageConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.corpus_path {
            config.corpus.path = Some(v.clone());
        }
        if let Some(ref v) = cli.registry_path {
            config.corpus.registry_path = Some(v.clone());
        }
        if let Some(v) = cli.threads {
            config.classify.threads = Some(v);
        }
        if let Some(v) = cli.parallel {
            config.classify.parallel = Some(v);
        }
        if let Some(ref v) = cli.report_format {
            config.report.format = Some(v.clone());
        }
        if let Some(ref v) = cli.report_output {
            config.report.output = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level triage config directory: `~/.triage/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".triage"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
