//! Export command implementation.

use crate::cli::ExportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use attest_report::RunReport;
use std::path::{Path, PathBuf};

/// Execute the export command: verify and write the structured document.
pub fn execute_export(
    args: ExportArgs,
    registry: Option<&Path>,
    config: &Config,
    formatter: &Formatter,
) -> Result<RunReport> {
    let report = super::verify(registry, &config.engine)?;
    let path = output_path(&args, config);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    report.write_json(&path)?;
    tracing::info!(path = %path.display(), "Exported report");

    println!("{}", formatter.exported(&path, &report));
    Ok(report)
}

fn output_path(args: &ExportArgs, config: &Config) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| config.report.output_path.clone())
}
