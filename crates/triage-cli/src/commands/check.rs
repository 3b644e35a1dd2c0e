use anyhow::Result;
use triage_core::errors::{PipelineError, TriageErrorCode};

use super::{load_config, run_report};
use crate::exit_codes;
use crate::Cli;

/// Print one line per mismatch and rejection; fail if there are any.
///
/// Rejections come from the run's non-fatal errors, so they are listed even
/// when the report itself omits them.
pub fn run(cli: &Cli) -> Result<u8> {
    let config = load_config(cli, None)?;
    let result = run_report(cli, &config)?;
    let report = &result.data;
    let mismatches = report.mismatches();

    for m in &mismatches {
        println!(
            "MISMATCH {}: expected {}{}, got {}{}",
            m.case_id,
            m.expected.verdict,
            subcategory_suffix(m.expected.subcategory),
            m.actual.verdict,
            subcategory_suffix(m.actual.subcategory),
        );
    }
    for error in &result.errors {
        match error {
            PipelineError::Corpus(e) => println!(
                "REJECTED {}: [{}] {}",
                e.case_id().unwrap_or("-"),
                e.error_code(),
                e
            ),
            other => println!("ERROR {}", other.display_string()),
        }
    }
    let unchecked = report.verdicts.iter().filter(|v| v.expected.is_none()).count();

    println!(
        "{} cases, {} mismatches, {} rejected, {} without expectation",
        report.summary.cases,
        mismatches.len(),
        report.summary.rejected,
        unchecked
    );

    if mismatches.is_empty() && result.is_clean() {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::FINDINGS)
    }
}

fn subcategory_suffix(sub: Option<triage_analysis::Subcategory>) -> String {
    sub.map(|s| format!(" ({s})")).unwrap_or_default()
}
