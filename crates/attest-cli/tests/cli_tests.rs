//! Integration tests for the `attest` binary

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to run the binary in `dir` with an isolated home directory
fn attest(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_attest"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .env_remove("ATTEST_REGISTRY")
        .output()
        .unwrap()
}

const FAILING_REGISTRY: &str = r#"
[[claims]]
id = "T1"
name = "Loop"
tier = 0
provenance = "proved"
gap = "closed"
dependencies = ["T1"]
"#;

#[test]
fn test_default_run_passes() {
    let dir = TempDir::new().unwrap();
    let output = attest(dir.path(), &["--no-color"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("PASS: 38/38 claims passed"));
}

#[test]
fn test_json_run_is_the_structured_document() {
    let dir = TempDir::new().unwrap();
    let output = attest(dir.path(), &["run", "--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["totalClaims"], 38);
    assert_eq!(value["overallPass"], true);
}

#[test]
fn test_failing_registry_exits_with_one() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("registry.toml"), FAILING_REGISTRY).unwrap();

    let output = attest(dir.path(), &["--no-color", "--registry", "registry.toml"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("FAIL"));
}

#[test]
fn test_unloadable_registry_exits_with_three() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("registry.toml"), "claims = \"none\"").unwrap();

    let output = attest(dir.path(), &["--registry", "registry.toml"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_config_exits_with_two() {
    let dir = TempDir::new().unwrap();
    let output = attest(dir.path(), &["--config", "absent.toml"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_local_config_sets_format() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("attest.toml"), "[settings]\nformat = \"json\"\n").unwrap();

    let output = attest(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["overallPass"], true);
}

#[test]
fn test_audit_command() {
    let dir = TempDir::new().unwrap();
    let output = attest(dir.path(), &["audit", "--no-color"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Audit catalogue"));
    assert!(stdout.contains("Gap audit"));
}

#[test]
fn test_export_uses_configured_path() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("attest.toml"),
        "[report]\noutput_path = \"out/report.json\"\n",
    )
    .unwrap();

    let output = attest(dir.path(), &["export", "--no-color"]);

    assert_eq!(output.status.code(), Some(0));
    let written = std::fs::read_to_string(dir.path().join("out/report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["totalClaims"], 38);
}
