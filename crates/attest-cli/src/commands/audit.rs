//! Audit command implementation.

use crate::error::Result;
use crate::output::Formatter;
use attest_report::{EngineConfig, RunReport};
use std::path::Path;

/// Execute the audit command: verify and print the audit catalogue.
pub fn execute_audit(
    registry: Option<&Path>,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<RunReport> {
    let report = super::verify(registry, config)?;
    println!("{}", formatter.format_audit(&report)?);
    Ok(report)
}
