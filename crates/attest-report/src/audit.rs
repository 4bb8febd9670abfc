//! Audit catalogue
//!
//! A fixed list of named meta-checks over a finished report. Every check
//! reads fields the pipeline already produced; none re-runs a component.

use serde::Serialize;

use crate::report::{RunReport, WitnessState};

/// Outcome of a meta-check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// Nothing found
    Pass,
    /// Soft finding
    Warn,
    /// Hard finding
    Fail,
}

impl AuditStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Pass => "pass",
            AuditStatus::Warn => "warn",
            AuditStatus::Fail => "fail",
        }
    }
}

/// How much a failing meta-check matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or informational
    Low,
    /// Modeling smell
    Medium,
    /// Weakens the report's guarantees
    High,
    /// Invalidates the run
    Critical,
}

impl Severity {
    /// Get the severity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// One meta-check in the catalogue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditCheck {
    /// Stable identifier (`A01` ...)
    pub id: &'static str,

    /// Check name
    pub name: &'static str,

    /// Outcome
    pub status: AuditStatus,

    /// Severity of a non-passing outcome
    pub severity: Severity,

    /// What was found
    pub detail: String,
}

fn check(
    id: &'static str,
    name: &'static str,
    severity: Severity,
    status: AuditStatus,
    detail: String,
) -> AuditCheck {
    AuditCheck {
        id,
        name,
        status,
        severity,
        detail,
    }
}

fn status_if(found: bool, status: AuditStatus) -> AuditStatus {
    if found {
        status
    } else {
        AuditStatus::Pass
    }
}

fn subjects<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let mut ids: Vec<&str> = ids.collect();
    ids.dedup();
    ids.join(", ")
}

fn violation_check(
    report: &RunReport,
    id: &'static str,
    name: &'static str,
    severity: Severity,
    matches: impl Fn(&str, Option<&str>) -> bool,
    clean: &str,
) -> AuditCheck {
    let found: Vec<&str> = report
        .violations
        .iter()
        .filter(|v| matches(&v.kind, v.field.as_deref()))
        .map(|v| v.claim_id.as_str())
        .collect();
    if found.is_empty() {
        check(id, name, severity, AuditStatus::Pass, clean.to_string())
    } else {
        let detail = format!("{} violation(s): {}", found.len(), subjects(found.into_iter()));
        check(id, name, severity, AuditStatus::Fail, detail)
    }
}

fn warning_check(
    report: &RunReport,
    id: &'static str,
    name: &'static str,
    severity: Severity,
    kind: &str,
    clean: &str,
) -> AuditCheck {
    let found: Vec<&str> = report
        .warnings_of(kind)
        .map(|w| w.claim_id.as_str())
        .collect();
    if found.is_empty() {
        check(id, name, severity, AuditStatus::Pass, clean.to_string())
    } else {
        let detail = format!("{} finding(s): {}", found.len(), subjects(found.into_iter()));
        check(id, name, severity, AuditStatus::Warn, detail)
    }
}

/// Build the audit catalogue for a report
pub(crate) fn catalogue(report: &RunReport) -> Vec<AuditCheck> {
    let total = report.total_claims;
    let accepted = report
        .claims
        .iter()
        .filter(|c| c.provenance_status != "unchecked")
        .count();
    let witnessed = report
        .claims
        .iter()
        .filter(|c| c.witness != WitnessState::None)
        .count();
    let skipped: Vec<&str> = report
        .claims
        .iter()
        .filter(|c| c.witness == WitnessState::Skipped)
        .map(|c| c.id.as_str())
        .collect();
    let failures: Vec<&str> = report.witness_failures().map(|w| w.claim_id.as_str()).collect();
    let nondeterministic: Vec<&str> = report
        .witness_results
        .iter()
        .filter(|w| w.nondeterministic)
        .map(|w| w.claim_id.as_str())
        .collect();
    let missing_sources: Vec<&str> = report
        .claims
        .iter()
        .filter(|c| c.provenance.as_deref() == Some("import-gated"))
        .filter(|c| c.provenance_detail.as_deref().map_or(true, str::is_empty))
        .map(|c| c.id.as_str())
        .collect();
    let incoherent_gaps: Vec<&str> = report
        .claims
        .iter()
        .filter(|c| c.gap.as_deref() == Some("import"))
        .filter(|c| c.provenance.as_deref() != Some("import-gated"))
        .map(|c| c.id.as_str())
        .collect();

    let executed = report
        .claims
        .iter()
        .filter(|c| matches!(c.witness, WitnessState::Passed | WitnessState::Failed))
        .count();
    let complete = report.claims.len() == total && report.witness_results.len() == executed;

    let expected_pass = report.violations.is_empty() && failures.is_empty();
    let expected_status = if report.overall_pass { 0 } else { 1 };
    let consistent_exit = report.overall_pass == expected_pass && report.exit_status == expected_status;

    let histograms_agree = report.by_provenance_tag.total() == accepted
        && report.by_gap_classification.total() == accepted;

    vec![
        violation_check(
            report,
            "A01",
            "Schema completeness",
            Severity::Critical,
            |kind, _| kind == "schema",
            "every record carries its required fields",
        ),
        violation_check(
            report,
            "A02",
            "Identifier uniqueness",
            Severity::Critical,
            |kind, _| kind == "duplicate-id",
            "identifiers are unique across axioms and claims",
        ),
        violation_check(
            report,
            "A03",
            "Reference resolution",
            Severity::Critical,
            |kind, _| kind == "dangling-reference",
            "every reference resolves",
        ),
        violation_check(
            report,
            "A04",
            "Enumeration membership",
            Severity::High,
            |_, field| matches!(field, Some("provenance" | "gap" | "witness.mode")),
            "tags, gaps and modes are drawn from their enumerations",
        ),
        violation_check(
            report,
            "A05",
            "Tier validity",
            Severity::Medium,
            |_, field| field == Some("tier"),
            "every tier is a small non-negative integer",
        ),
        violation_check(
            report,
            "A06",
            "Cycle freedom",
            Severity::Critical,
            |kind, _| kind == "cycle",
            "the claim dependency graph is acyclic",
        ),
        warning_check(
            report,
            "A07",
            "Designed mutual constraints",
            Severity::Low,
            "allowed-cycle",
            "no cycle relies on the exception list",
        ),
        warning_check(
            report,
            "A08",
            "Tier ordering",
            Severity::Low,
            "tier-order",
            "no claim depends on a later tier",
        ),
        if skipped.is_empty() {
            check(
                "A09",
                "Witness presence",
                Severity::High,
                AuditStatus::Pass,
                format!("{} of {} claims carry a witness, all executed", witnessed, total),
            )
        } else {
            check(
                "A09",
                "Witness presence",
                Severity::High,
                AuditStatus::Warn,
                format!(
                    "{} witness(es) skipped after schema rejection: {}",
                    skipped.len(),
                    subjects(skipped.into_iter())
                ),
            )
        },
        check(
            "A10",
            "Witness success",
            Severity::Critical,
            status_if(!failures.is_empty(), AuditStatus::Fail),
            if failures.is_empty() {
                format!("{} witness(es) hold", report.witness_results.len())
            } else {
                format!("{} failure(s): {}", failures.len(), subjects(failures.into_iter()))
            },
        ),
        check(
            "A11",
            "Witness determinism",
            Severity::High,
            status_if(!nondeterministic.is_empty(), AuditStatus::Fail),
            if nondeterministic.is_empty() {
                "every witness gave the same outcome on both passes".to_string()
            } else {
                format!("nondeterministic: {}", subjects(nondeterministic.into_iter()))
            },
        ),
        warning_check(
            report,
            "A12",
            "Label monotonicity",
            Severity::Medium,
            "label",
            "no tag is stronger than its dependency closure",
        ),
        warning_check(
            report,
            "A13",
            "Provenance determinacy",
            Severity::Medium,
            "indeterminate",
            "every accepted claim has an implied tag",
        ),
        check(
            "A14",
            "Import source references",
            Severity::Medium,
            status_if(!missing_sources.is_empty(), AuditStatus::Warn),
            if missing_sources.is_empty() {
                format!("{} cited source(s) catalogued", report.imports.len())
            } else {
                format!("missing source: {}", subjects(missing_sources.into_iter()))
            },
        ),
        check(
            "A15",
            "Gap classification coherence",
            Severity::Low,
            status_if(!incoherent_gaps.is_empty(), AuditStatus::Warn),
            if incoherent_gaps.is_empty() {
                "every import gap is carried by an import-gated claim".to_string()
            } else {
                format!(
                    "import gap without import-gated tag: {}",
                    subjects(incoherent_gaps.into_iter())
                )
            },
        ),
        check(
            "A16",
            "Report completeness",
            Severity::High,
            status_if(!complete, AuditStatus::Fail),
            if complete {
                format!("{} claim row(s), {} witness result(s)", total, executed)
            } else {
                format!(
                    "{} of {} claim row(s), {} of {} witness result(s)",
                    report.claims.len(),
                    total,
                    report.witness_results.len(),
                    executed
                )
            },
        ),
        check(
            "A17",
            "Exit status consistency",
            Severity::Critical,
            status_if(!consistent_exit, AuditStatus::Fail),
            format!(
                "overall {} with exit status {}",
                if report.overall_pass { "PASS" } else { "FAIL" },
                report.exit_status
            ),
        ),
        check(
            "A18",
            "Histogram consistency",
            Severity::High,
            status_if(!histograms_agree, AuditStatus::Fail),
            format!(
                "{} accepted claim(s), {} by tag, {} by gap",
                accepted,
                report.by_provenance_tag.total(),
                report.by_gap_classification.total()
            ),
        ),
        warning_check(
            report,
            "A19",
            "Axiom usage",
            Severity::Low,
            "unused-axiom",
            "every axiom is referenced",
        ),
        check(
            "A20",
            "Registry population",
            Severity::Low,
            status_if(total == 0, AuditStatus::Warn),
            format!("{} claim(s) defined", total),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Engine, EngineConfig};
    use attest_domain::{builtin_registry, Registry};

    fn audit(registry: &Registry) -> Vec<AuditCheck> {
        Engine::new(EngineConfig::default()).run(registry).audit
    }

    fn status(checks: &[AuditCheck], id: &str) -> AuditStatus {
        checks.iter().find(|c| c.id == id).unwrap().status
    }

    #[test]
    fn test_catalogue_has_twenty_checks_in_order() {
        let checks = audit(&Registry::default());
        let ids: Vec<&str> = checks.iter().map(|c| c.id).collect();
        let expected: Vec<String> = (1..=20).map(|n| format!("A{:02}", n)).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_builtin_registry_audit() {
        let checks = audit(&builtin_registry().unwrap());

        assert!(checks.iter().all(|c| c.status != AuditStatus::Fail));
        assert_eq!(status(&checks, "A08"), AuditStatus::Warn);
        assert_eq!(status(&checks, "A10"), AuditStatus::Pass);
        assert_eq!(status(&checks, "A12"), AuditStatus::Pass);
        assert_eq!(status(&checks, "A16"), AuditStatus::Pass);
        assert_eq!(status(&checks, "A18"), AuditStatus::Pass);
    }

    #[test]
    fn test_empty_registry_warns() {
        let checks = audit(&Registry::default());
        assert_eq!(status(&checks, "A20"), AuditStatus::Warn);
        assert_eq!(status(&checks, "A17"), AuditStatus::Pass);
    }

    #[test]
    fn test_cycle_fails_cycle_check_only() {
        let registry = Registry::from_toml_str(
            r#"
            [[claims]]
            id = "T1"
            name = "Loop"
            tier = 0
            provenance = "structural"
            gap = "open"
            dependencies = ["T1"]
            "#,
        )
        .unwrap();
        let checks = audit(&registry);

        assert_eq!(status(&checks, "A06"), AuditStatus::Fail);
        assert_eq!(status(&checks, "A13"), AuditStatus::Warn);
        assert_eq!(status(&checks, "A17"), AuditStatus::Pass);
        assert_eq!(status(&checks, "A01"), AuditStatus::Pass);
    }

    #[test]
    fn test_unknown_tag_fails_enumeration_check() {
        let registry = Registry::from_toml_str(
            r#"
            [[claims]]
            id = "T1"
            name = "Claim"
            tier = 0
            provenance = "certain"
            gap = "closed"
            "#,
        )
        .unwrap();
        let checks = audit(&registry);

        assert_eq!(status(&checks, "A01"), AuditStatus::Fail);
        assert_eq!(status(&checks, "A04"), AuditStatus::Fail);
        assert_eq!(status(&checks, "A05"), AuditStatus::Pass);
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(Severity::Critical.as_str(), "critical");
        assert_eq!(AuditStatus::Warn.as_str(), "warn");
    }

    #[test]
    fn test_nondeterministic_witness_fails_determinism_check() {
        let mut report = Engine::new(EngineConfig::default()).run(&builtin_registry().unwrap());
        assert_eq!(status(&catalogue(&report), "A11"), AuditStatus::Pass);

        // A failure whose diagnostic merely mentions the word is not flagged
        report.witness_results[0].success = false;
        report.witness_results[0].diagnostic = Some("nondeterministic input".to_string());
        assert_eq!(status(&catalogue(&report), "A11"), AuditStatus::Pass);

        report.witness_results[1].nondeterministic = true;
        let checks = catalogue(&report);
        let a11 = checks.iter().find(|c| c.id == "A11").unwrap();
        assert_eq!(a11.status, AuditStatus::Fail);
        assert!(a11.detail.contains(&report.witness_results[1].claim_id));
    }
}
