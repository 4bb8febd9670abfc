//! Run command implementation.

use crate::error::Result;
use crate::output::Formatter;
use attest_report::{EngineConfig, RunReport};
use std::path::Path;

/// Execute the default run: verify and print the summary.
pub fn execute_run(
    registry: Option<&Path>,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<RunReport> {
    let report = super::verify(registry, config)?;
    println!("{}", formatter.format_run(&report)?);
    Ok(report)
}
