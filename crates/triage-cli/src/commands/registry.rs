use anyhow::{Context, Result};
use serde::Serialize;
use triage_analysis::classifier::builtin::technique_tier;
use triage_analysis::engine::build_registry;
use triage_core::config::ReportFormat;

use super::load_config;
use crate::exit_codes;
use crate::Cli;

#[derive(Debug, Serialize)]
struct SanitizerRow<'a> {
    identity: &'a str,
    technique: &'static str,
    strength: &'static str,
    category: &'static str,
}

#[derive(Debug, Serialize)]
struct GuardRow<'a> {
    identity: &'a str,
    category: &'static str,
}

#[derive(Debug, Serialize)]
struct RegistryDump<'a> {
    version: u32,
    extensions: usize,
    sanitizers: Vec<SanitizerRow<'a>>,
    guards: Vec<GuardRow<'a>>,
}

/// Print the effective registry (built-ins plus any configured extension).
pub fn run(cli: &Cli) -> Result<u8> {
    let config = load_config(cli, None)?;
    let registry = build_registry(&config, &cli.root).context("building registry")?;

    let dump = RegistryDump {
        version: registry.version(),
        extensions: registry.extensions(),
        sanitizers: registry
            .sanitizer_entries()
            .into_iter()
            .map(|(identity, technique)| {
                let (strength, category) = technique_tier(technique);
                SanitizerRow {
                    identity,
                    technique: technique.name(),
                    strength: strength.name(),
                    category: category.name(),
                }
            })
            .collect(),
        guards: registry
            .guard_entries()
            .into_iter()
            .map(|(identity, category)| GuardRow {
                identity,
                category: category.name(),
            })
            .collect(),
    };

    // Tabular unless a format was asked for.
    match cli.format.map(ReportFormat::from) {
        Some(ReportFormat::Json) => println!("{}", serde_json::to_string(&dump)?),
        Some(ReportFormat::Pretty) => println!("{}", serde_json::to_string_pretty(&dump)?),
        None => print_table(&dump),
    }
    Ok(exit_codes::SUCCESS)
}

fn print_table(dump: &RegistryDump<'_>) {
    println!(
        "registry version {} ({} extension entries)",
        dump.version, dump.extensions
    );
    println!();
    println!("{:<48} {:<22} {:<7} CATEGORY", "SANITIZER", "TECHNIQUE", "TIER");
    for row in &dump.sanitizers {
        println!(
            "{:<48} {:<22} {:<7} {}",
            row.identity, row.technique, row.strength, row.category
        );
    }
    println!();
    println!("{:<48} CATEGORY", "GUARD");
    for row in &dump.guards {
        println!("{:<48} {}", row.identity, row.category);
    }
}
