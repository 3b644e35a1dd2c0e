//! Subcommand implementations. Each returns the process exit code.

pub mod check;
pub mod classify;
pub mod grade;
pub mod registry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use triage_analysis::engine::run_pipeline;
use triage_analysis::TriageReport;
use triage_core::config::TriageConfig;
use triage_core::errors::PipelineResult;

use crate::Cli;

/// Resolve the layered configuration with the global flags on top.
pub fn load_config(cli: &Cli, output: Option<PathBuf>) -> Result<TriageConfig> {
    let mut overrides = cli.overrides();
    overrides.report_output = output;
    TriageConfig::load(&cli.root, Some(&overrides))
        .with_context(|| format!("loading configuration under {}", cli.root.display()))
}

/// Load, classify and report with the resolved configuration.
pub fn run_report(cli: &Cli, config: &TriageConfig) -> Result<PipelineResult<TriageReport>> {
    let result = run_pipeline(config, &cli.root).context("classification run failed")?;
    for error in &result.errors {
        tracing::debug!(error = %error, "non-fatal");
    }
    Ok(result)
}
