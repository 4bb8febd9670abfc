//! End-to-end tests for the verification pipeline

use attest_domain::{builtin_registry, Registry};
use attest_report::{AuditStatus, Engine, EngineConfig, RunReport, WitnessState};

/// Helper to run the engine with the default configuration
fn run(definition: &str) -> RunReport {
    let registry = Registry::from_toml_str(definition).unwrap();
    Engine::new(EngineConfig::default()).run(&registry)
}

const TWO_CLAIMS: &str = r#"
[[axioms]]
id = "A1"
name = "Finite capacity"

[[claims]]
id = "T1"
name = "Ratio"
tier = 0
provenance = "proved"
gap = "closed"
dependencies = ["A1"]

[claims.witness]
check = "ratio"
expression = "3/13"
mode = "exact-equality"
expected = "3/13"

[[claims]]
id = "T2"
name = "Consequence"
tier = 1
provenance = "structural"
gap = "closed"
dependencies = ["T1"]
"#;

#[test]
fn test_empty_registry() {
    let report = run("");

    assert_eq!(report.total_claims, 0);
    assert_eq!(report.passed_claims, 0);
    assert!(report.overall_pass);
    assert_eq!(report.exit_status, 0);
    assert!(report.violations.is_empty());
    assert!(report.by_provenance_tag.is_empty());

    let population = report.audit.iter().find(|c| c.id == "A20").unwrap();
    assert_eq!(population.status, AuditStatus::Warn);
}

#[test]
fn test_two_claims_pass() {
    let report = run(TWO_CLAIMS);

    assert_eq!(report.total_claims, 2);
    assert_eq!(report.passed_claims, 2);
    assert!(report.overall_pass);
    assert!(report.violations.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.witness_results.len(), 1);
    assert_eq!(report.claim("T1").unwrap().witness, WitnessState::Passed);
    assert_eq!(report.claim("T2").unwrap().implied_tier, Some(1));
    assert_eq!(report.by_provenance_tag.get("proved"), 1);
    assert_eq!(report.by_provenance_tag.get("structural"), 1);
    assert_eq!(report.by_gap_classification.get("closed"), 2);
}

#[test]
fn test_self_dependency_is_one_cycle() {
    let report = run(&TWO_CLAIMS.replace(r#"dependencies = ["T1"]"#, r#"dependencies = ["T1", "T2"]"#));

    assert!(!report.overall_pass);
    assert_eq!(report.exit_status, 1);
    assert_eq!(report.violations.len(), 1);

    let violation = &report.violations[0];
    assert_eq!(violation.kind, "cycle");
    assert_eq!(violation.claim_id, "T2");
    assert_eq!(violation.detail, "T2 -> T2");
    assert!(!report.claim("T2").unwrap().passed);
    assert!(report.claim("T1").unwrap().passed);
}

#[test]
fn test_removing_cycle_edge_restores_pass() {
    let cyclic = run(&TWO_CLAIMS.replace(r#"dependencies = ["T1"]"#, r#"dependencies = ["T1", "T2"]"#));
    let acyclic = run(TWO_CLAIMS);

    assert!(!cyclic.overall_pass);
    assert!(acyclic.overall_pass);
}

#[test]
fn test_mutual_cycle_reported_once() {
    let definition = format!(
        "{}{}",
        TWO_CLAIMS.replace(r#"dependencies = ["T1"]"#, r#"dependencies = ["T3"]"#),
        r#"
[[claims]]
id = "T3"
name = "Partner"
tier = 1
provenance = "structural"
gap = "closed"
dependencies = ["T2"]
"#
    );
    let report = run(&definition);

    assert_eq!(report.violations_of("cycle").count(), 1);
    assert_eq!(report.claim("T2").unwrap().provenance_status, "indeterminate");
    assert_eq!(report.claim("T3").unwrap().provenance_status, "indeterminate");
}

#[test]
fn test_division_by_zero_diagnostic() {
    let definition = format!(
        "{}{}",
        TWO_CLAIMS,
        r#"
[[claims]]
id = "T3"
name = "Broken"
tier = 1
provenance = "structural"
gap = "closed"
dependencies = ["T1"]

[claims.witness]
check = "broken"
expression = "1/0"
mode = "exact-equality"
expected = "0"
"#
    );
    let report = run(&definition);

    assert!(!report.overall_pass);
    assert!(report.violations.is_empty());

    let failures: Vec<_> = report.witness_failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].claim_id, "T3");
    assert!(failures[0].diagnostic.as_deref().unwrap().contains("division by zero"));
    assert_eq!(report.claim("T3").unwrap().witness, WitnessState::Failed);
    assert!(!report.claim("T3").unwrap().passed);
}

#[test]
fn test_rational_matches_decimal_within_tolerance() {
    let report = run(&TWO_CLAIMS.replace(r#"expected = "3/13""#, r#"expected = "0.230769230769""#));

    assert!(report.overall_pass);
    let witness = &report.witness_results[0];
    assert!(witness.success);
    assert_eq!(witness.value_text.as_deref(), Some("3/13"));
}

#[test]
fn test_convention_dependency_under_proved_warns() {
    let definition = r#"
[[axioms]]
id = "A1"
name = "Finite capacity"

[[claims]]
id = "T1"
name = "Normalisation"
tier = 0
provenance = "convention"
reason = "unit choice"
gap = "reduced"
dependencies = ["A1"]

[[claims]]
id = "T2"
name = "Result"
tier = 1
provenance = "proved"
gap = "closed"
dependencies = ["T1"]
"#;
    let report = run(definition);

    assert!(report.overall_pass);
    let labels: Vec<_> = report.warnings_of("label").collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].claim_id, "T2");
    assert_eq!(report.claim("T2").unwrap().provenance_status, "overclaimed");
    assert_eq!(report.claim("T2").unwrap().implied_tag.as_deref(), Some("convention"));
}

#[test]
fn test_schema_rejection_skips_witness() {
    let report = run(&TWO_CLAIMS.replace(r#"provenance = "proved""#, r#"provenance = "certain""#));

    assert!(!report.overall_pass);
    assert_eq!(report.violations_of("schema").count(), 1);
    assert!(report.witness_results.is_empty());

    let row = report.claim("T1").unwrap();
    assert!(!row.passed);
    assert_eq!(row.witness, WitnessState::Skipped);
    assert_eq!(row.provenance_status, "unchecked");
    assert_eq!(report.claim("T2").unwrap().provenance_status, "indeterminate");
}

#[test]
fn test_identical_runs_serialize_identically() {
    let registry = builtin_registry().unwrap();
    let engine = Engine::new(EngineConfig::default());

    let first = engine.run(&registry).to_json().unwrap();
    let second = engine.run(&registry).to_json().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_builtin_registry_passes() {
    let registry = builtin_registry().unwrap();
    let report = Engine::new(EngineConfig::default()).run(&registry);

    assert!(report.overall_pass);
    assert_eq!(report.total_claims, 38);
    assert_eq!(report.passed_claims, 38);
    assert_eq!(report.witness_results.len(), 12);
    assert!(report.violations.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, "tier-order");
    assert_eq!(report.warnings_of("label").count(), 0);
    assert_eq!(report.by_provenance_tag.total(), 38);
    assert!(report.audit.iter().all(|c| c.status != AuditStatus::Fail));
}

#[test]
fn test_allowed_cycle_from_config() {
    let definition = format!(
        "{}{}",
        TWO_CLAIMS.replace(r#"dependencies = ["T1"]"#, r#"dependencies = ["T1", "T3"]"#),
        r#"
[[claims]]
id = "T3"
name = "Partner"
tier = 1
provenance = "structural"
gap = "closed"
dependencies = ["T2"]
"#
    );
    let registry = Registry::from_toml_str(&definition).unwrap();

    let strict = Engine::new(EngineConfig::default()).run(&registry);
    assert!(!strict.overall_pass);

    let config = EngineConfig {
        allowed_cycles: vec![vec!["T2".to_string(), "T3".to_string()]],
        ..Default::default()
    };
    let relaxed = Engine::new(config).run(&registry);
    assert!(relaxed.overall_pass);
    assert_eq!(relaxed.warnings_of("allowed-cycle").count(), 1);
}

#[test]
fn test_json_document_fields() {
    let report = run(TWO_CLAIMS);
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["totalClaims"], 2);
    assert_eq!(value["passedClaims"], 2);
    assert_eq!(value["overallPass"], true);
    assert_eq!(value["byProvenanceTag"]["proved"], 1);
    assert_eq!(value["byGapClassification"]["closed"], 2);
    assert!(value["violations"].as_array().unwrap().is_empty());
    assert_eq!(value["witnessResults"][0]["claimId"], "T1");
    assert!(value["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn test_export_overwrites_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    std::fs::write(&path, "stale contents that are longer than nothing").unwrap();

    let report = run(TWO_CLAIMS);
    report.write_json(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, format!("{}\n", report.to_json().unwrap()));
    assert!(!written.contains("stale"));
}
