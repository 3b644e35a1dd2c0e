use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Args;
use triage_analysis::grading::{grade, load_submissions};
use triage_core::config::ReportFormat;

use super::{load_config, run_report};
use crate::exit_codes;
use crate::Cli;

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// JSON array of `{ case_id, overall, subcategory? }` submissions
    #[arg(short, long)]
    pub submissions: PathBuf,

    /// Fail when exact-match accuracy falls below this fraction
    #[arg(long, default_value_t = 0.0)]
    pub min_accuracy: f64,
}

pub fn run(cli: &Cli, args: &GradeArgs) -> Result<u8> {
    ensure!(
        (0.0..=1.0).contains(&args.min_accuracy),
        "--min-accuracy must be within [0, 1], got {}",
        args.min_accuracy
    );

    let config = load_config(cli, None)?;
    let report = run_report(cli, &config)?.data;
    let submissions = load_submissions(&args.submissions)?;
    let grades = grade(&report, &submissions);

    let rendered = match config.report.effective_format()? {
        ReportFormat::Json => serde_json::to_string(&grades)?,
        ReportFormat::Pretty => serde_json::to_string_pretty(&grades)?,
    };
    println!("{rendered}");

    if grades.accuracy < args.min_accuracy {
        eprintln!(
            "accuracy {:.3} below required {:.3}",
            grades.accuracy, args.min_accuracy
        );
        return Ok(exit_codes::FINDINGS);
    }
    Ok(exit_codes::SUCCESS)
}
