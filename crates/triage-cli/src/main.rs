//! `triage`: classify a vulnerability corpus, check it against its narrated
//! ground truth, grade a scanner's submissions, inspect the registry.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use triage_core::config::{CliOverrides, ReportFormat};

/// Taint-path triage classifier
#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    about = "Classify taint-path vulnerability cases into triage verdicts",
    long_about = "triage loads a corpus of vulnerability cases, evaluates each candidate \
                  path for liveness, sanitization and guards, and reduces the per-path \
                  verdicts to one case verdict with subcategory and confidence."
)]
pub struct Cli {
    /// Project root; relative corpus and registry paths resolve against it
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Corpus description file
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Registry extension file
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Classification threads (0 = rayon default)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Classify cases sequentially
    #[arg(long, global = true)]
    pub no_parallel: bool,

    /// Report format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every case and emit the verdict report
    Classify(commands::classify::ClassifyArgs),

    /// Compare computed verdicts with each case's expectation
    Check,

    /// Grade a scanner's submitted verdicts against the computed report
    Grade(commands::grade::GradeArgs),

    /// Print the sanitizer and guard registry
    Registry,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}

impl From<CliFormat> for ReportFormat {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Json => ReportFormat::Json,
            CliFormat::Pretty => ReportFormat::Pretty,
        }
    }
}

impl Cli {
    /// Flags that override the layered configuration.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            corpus_path: self.corpus.clone(),
            registry_path: self.registry.clone(),
            threads: self.threads,
            parallel: self.no_parallel.then_some(false),
            report_format: self.format.map(|f| ReportFormat::from(f).name().to_string()),
            report_output: None,
        }
    }
}

/// Exit codes for CI integration
pub mod exit_codes {
    /// Run completed, nothing to report
    pub const SUCCESS: u8 = 0;
    /// Mismatches, rejections, or accuracy below threshold
    pub const FINDINGS: u8 = 1;
    /// Configuration, corpus or I/O failure
    pub const ERROR: u8 = 2;
}

fn main() -> ExitCode {
    triage_core::tracing::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Classify(ref args) => commands::classify::run(&cli, args),
        Commands::Check => commands::check::run(&cli),
        Commands::Grade(ref args) => commands::grade::run(&cli, args),
        Commands::Registry => commands::registry::run(&cli),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_codes::ERROR)
        }
    }
}
