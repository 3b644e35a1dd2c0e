use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{load_config, run_report};
use crate::exit_codes;
use crate::Cli;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(cli: &Cli, args: &ClassifyArgs) -> Result<u8> {
    let config = load_config(cli, args.output.clone())?;
    let result = run_report(cli, &config)?;

    let format = config.report.effective_format()?;
    result
        .data
        .write(format, config.report.output.as_deref())?;

    if let Some(ref output) = config.report.output {
        eprintln!(
            "{} verdicts, {} rejected, written to {}",
            result.data.summary.cases,
            result.data.summary.rejected,
            output.display()
        );
    }
    Ok(exit_codes::SUCCESS)
}
