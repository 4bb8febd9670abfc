//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use attest_report::{AuditCheck, AuditStatus, ClaimStatus, RunReport, WitnessState};
use colored::*;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest histogram bar, in characters.
const BAR_WIDTH: usize = 40;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a default run.
    pub fn format_run(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(report.to_json()?),
            OutputFormat::Table => Ok(self.format_run_table(report)),
        }
    }

    /// Format the audit catalogue and the per-claim gap audit.
    pub fn format_audit(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(report.to_json()?),
            OutputFormat::Table => Ok(self.format_audit_table(report)),
        }
    }

    fn format_run_table(&self, report: &RunReport) -> String {
        let mut sections = Vec::new();

        if report.claims.is_empty() {
            sections.push(self.colorize("No claims defined.", "yellow"));
        }

        for summary in &report.tiers {
            let rows: Vec<&ClaimStatus> = report
                .claims
                .iter()
                .filter(|c| c.tier == Some(summary.tier))
                .collect();
            sections.push(format!(
                "{} ({}/{} passed, {} witnessed)\n{}",
                self.colorize(&format!("Tier {}", summary.tier), "cyan"),
                summary.passed,
                summary.claims,
                summary.witnessed,
                self.claims_table(&rows)
            ));
        }

        let untiered: Vec<&ClaimStatus> = report.claims.iter().filter(|c| c.tier.is_none()).collect();
        if !untiered.is_empty() {
            sections.push(format!(
                "{}\n{}",
                self.colorize("No valid tier", "cyan"),
                self.claims_table(&untiered)
            ));
        }

        if !report.by_provenance_tag.is_empty() {
            sections.push(format!(
                "By provenance tag\n{}",
                histogram(report.by_provenance_tag.iter())
            ));
            sections.push(format!(
                "By gap classification\n{}",
                histogram(report.by_gap_classification.iter())
            ));
        }

        if !report.violations.is_empty() {
            let lines: Vec<String> = report
                .violations
                .iter()
                .map(|v| self.error(&format!("[{}] {}: {}", v.kind, v.claim_id, v.detail)))
                .collect();
            sections.push(format!("Violations\n{}", lines.join("\n")));
        }

        let failures: Vec<String> = report
            .witness_failures()
            .map(|w| {
                self.error(&format!(
                    "{} {}: {}",
                    w.claim_id,
                    w.check,
                    w.diagnostic.as_deref().unwrap_or("check did not hold")
                ))
            })
            .collect();
        if !failures.is_empty() {
            sections.push(format!("Witness failures\n{}", failures.join("\n")));
        }

        if !report.warnings.is_empty() {
            let lines: Vec<String> = report
                .warnings
                .iter()
                .map(|w| self.warning(&format!("[{}] {}: {}", w.kind, w.claim_id, w.detail)))
                .collect();
            sections.push(format!("Warnings\n{}", lines.join("\n")));
        }

        sections.push(self.verdict(report));
        sections.join("\n\n")
    }

    fn claims_table(&self, claims: &[&ClaimStatus]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Provenance", "Gap", "Witness", "Implied", "Status"]);

        for claim in claims {
            builder.push_record([
                claim.id.clone(),
                claim.name.clone(),
                claim.provenance.clone().unwrap_or_default(),
                claim.gap.clone().unwrap_or_default(),
                claim.witness.as_str().to_string(),
                claim.implied_tag.clone().unwrap_or_else(|| "-".to_string()),
                self.claim_mark(claim),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn format_audit_table(&self, report: &RunReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Check", "Severity", "Status", "Detail"]);
        for check in &report.audit {
            builder.push_record([
                check.id.to_string(),
                check.name.to_string(),
                check.severity.as_str().to_string(),
                self.audit_mark(check),
                check.detail.clone(),
            ]);
        }
        let mut checks = builder.build();
        checks
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut builder = Builder::default();
        builder.push_record(["ID", "Tier", "Provenance", "Gap", "Key result"]);
        for claim in &report.claims {
            builder.push_record([
                claim.id.clone(),
                claim.tier.map_or_else(|| "-".to_string(), |t| t.to_string()),
                claim.provenance.clone().unwrap_or_default(),
                claim.gap.clone().unwrap_or_default(),
                claim.key_result.clone().unwrap_or_default(),
            ]);
        }
        let mut gaps = builder.build();
        gaps.with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let counts = |status: AuditStatus| report.audit.iter().filter(|c| c.status == status).count();
        format!(
            "Audit catalogue ({} pass, {} warn, {} fail)\n{}\n\nGap audit\n{}\n\n{}",
            counts(AuditStatus::Pass),
            counts(AuditStatus::Warn),
            counts(AuditStatus::Fail),
            checks,
            gaps,
            self.verdict(report)
        )
    }

    /// Final PASS/FAIL line.
    pub fn verdict(&self, report: &RunReport) -> String {
        let summary = format!(
            "{}/{} claims passed, {} violation(s), {} warning(s)",
            report.passed_claims,
            report.total_claims,
            report.violations.len(),
            report.warnings.len()
        );
        if report.overall_pass {
            self.success(&format!("PASS: {}", summary))
        } else {
            self.error(&format!("FAIL: {}", summary))
        }
    }

    /// Confirmation printed after an export.
    pub fn exported(&self, path: &Path, report: &RunReport) -> String {
        let message = format!(
            "Report written to {} ({})",
            path.display(),
            if report.overall_pass { "PASS" } else { "FAIL" }
        );
        if report.overall_pass {
            self.success(&message)
        } else {
            self.warning(&message)
        }
    }

    fn claim_mark(&self, claim: &ClaimStatus) -> String {
        if !claim.passed {
            self.colorize("FAIL", "red")
        } else if claim.provenance_status == "overclaimed" || claim.witness == WitnessState::Skipped {
            self.colorize("WARN", "yellow")
        } else {
            self.colorize("ok", "green")
        }
    }

    fn audit_mark(&self, check: &AuditCheck) -> String {
        match check.status {
            AuditStatus::Pass => self.colorize("pass", "green"),
            AuditStatus::Warn => self.colorize("warn", "yellow"),
            AuditStatus::Fail => self.colorize("fail", "red"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Render histogram entries as `#` bars scaled to the largest count.
fn histogram<'a>(entries: impl Iterator<Item = (&'a str, usize)>) -> String {
    let entries: Vec<(&str, usize)> = entries.collect();
    let largest = entries.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
    let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    entries
        .iter()
        .map(|(key, count)| {
            let bar = (count * BAR_WIDTH).div_ceil(largest);
            format!("  {:<width$} {:>3} {}", key, count, "#".repeat(bar), width = width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_domain::{builtin_registry, Registry};
    use attest_report::{Engine, EngineConfig};

    fn builtin_report() -> RunReport {
        Engine::new(EngineConfig::default()).run(&builtin_registry().unwrap())
    }

    fn failing_report() -> RunReport {
        let registry = Registry::from_toml_str(
            r#"
            [[claims]]
            id = "T1"
            name = "Loop"
            tier = 0
            provenance = "proved"
            gap = "closed"
            dependencies = ["T1"]
            "#,
        )
        .unwrap();
        Engine::new(EngineConfig::default()).run(&registry)
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_run(&builtin_report()).unwrap();
        assert!(output.contains("Tier 0"));
        assert!(output.contains("Provenance"));
        assert!(output.contains("By gap classification"));
        assert!(output.ends_with("PASS: 38/38 claims passed, 0 violation(s), 1 warning(s)"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let report = builtin_report();
        let output = formatter.format_run(&report).unwrap();
        assert_eq!(output, report.to_json().unwrap());
        assert!(output.contains("\"overallPass\": true"));
    }

    #[test]
    fn test_failing_run_lists_violations() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_run(&failing_report()).unwrap();
        assert!(output.contains("Violations"));
        assert!(output.contains("[cycle] T1: T1 -> T1"));
        assert!(output.contains("FAIL: 0/1 claims passed"));
    }

    #[test]
    fn test_empty_registry() {
        let report = Engine::new(EngineConfig::default()).run(&Registry::default());
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_run(&report).unwrap();
        assert!(output.contains("No claims defined"));
        assert!(output.contains("PASS: 0/0"));
    }

    #[test]
    fn test_audit_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_audit(&builtin_report()).unwrap();
        assert!(output.contains("A01"));
        assert!(output.contains("A20"));
        assert!(output.contains("Gap audit"));
        assert!(output.contains("Key result"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }

    #[test]
    fn test_histogram_bars() {
        let output = histogram([("proved", 4), ("convention", 1)].into_iter());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(&"#".repeat(BAR_WIDTH)));
        assert!(lines[1].ends_with(&format!("1 {}", "#".repeat(BAR_WIDTH / 4))));
        assert!(lines[1].contains("convention"));
    }
}
