//! Configuration system for triage.
//! TOML-based, 5-layer resolution: CLI > env > project > user > defaults.

pub mod classify_config;
pub mod corpus_config;
pub mod report_config;
pub mod triage_config;

pub use classify_config::ClassifyConfig;
pub use corpus_config::CorpusConfig;
pub use report_config::{ReportConfig, ReportFormat};
pub use triage_config::{CliOverrides, TriageConfig};
