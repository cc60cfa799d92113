//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn ddms_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ddms"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).to_str().unwrap().to_string()
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_cli_validate_valid_record() {
    let output = Command::new(ddms_bin())
        .args(["validate", &fixture("resource_3_1.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "validate should succeed");
    assert!(stdout.contains("✓ Document is valid DDMS 3.1"));
}

#[test]
fn test_cli_validate_invalid_record() {
    let output = Command::new(ddms_bin())
        .args(["validate", &fixture("missing_title_4_1.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success(), "validate should fail");
    assert!(stdout.contains("✗ Document is invalid"));
    assert!(stdout.contains("title"));
}

#[test]
fn test_cli_validate_reports_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.xml");
    let xml = fs::read_to_string(fixture("resource_3_1.xml"))
        .unwrap()
        .replace("<ddms:description ", "<ddms:description ddms:unknown=\"1\" ");
    fs::write(&path, xml).unwrap();

    let output = Command::new(ddms_bin())
        .args(["validate", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "warnings should not fail validation");
    assert!(stdout.contains("Warnings:"));
    assert!(stdout.contains("ddms:description"));
}

#[test]
fn test_cli_validate_missing_file() {
    let output = Command::new(ddms_bin())
        .args(["validate", "does/not/exist.xml"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

// ============================================================================
// Render Command Tests
// ============================================================================

#[test]
fn test_cli_render_text() {
    let output = Command::new(ddms_bin())
        .args(["render", &fixture("resource_5_0.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "render should succeed");
    assert!(stdout.contains("title: DDMSence"));
    assert!(stdout.contains("ntk.DESVersion: 7"));
}

#[test]
fn test_cli_render_html_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("record.html");

    let output = Command::new(ddms_bin())
        .args([
            "render",
            "--format", "html",
            "--output", out.to_str().unwrap(),
            &fixture("resource_3_1.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "render --format html should succeed");
    let html = fs::read_to_string(out).unwrap();
    assert!(html.contains("<meta name=\"title\" content=\"DDMSence\""));
}

#[test]
fn test_cli_render_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"prefixes": {"ddms": "d"}}"#).unwrap();

    let output = Command::new(ddms_bin())
        .args([
            "--config", config.to_str().unwrap(),
            "render",
            "--format", "xml",
            &fixture("resource_3_1.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "render with config should succeed");
    assert!(stdout.starts_with("<d:Resource"));
}

// ============================================================================
// Convert Command Tests
// ============================================================================

#[test]
fn test_cli_convert_between_versions() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("converted.xml");

    let output = Command::new(ddms_bin())
        .args([
            "convert",
            "--to", "4.1",
            "--output", out.to_str().unwrap(),
            &fixture("resource_3_1.xml"),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "convert should succeed");
    let xml = fs::read_to_string(out).unwrap();
    assert!(xml.contains("urn:us:mil:ces:metadata:ddms:4"));
    assert!(xml.contains("<ddms:person>"));
}

#[test]
fn test_cli_convert_rejects_unsupported_content() {
    let output = Command::new(ddms_bin())
        .args(["convert", "--to", "3.1", &fixture("resource_5_0.xml")])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_cli_convert_unknown_version() {
    let output = Command::new(ddms_bin())
        .args(["convert", "--to", "9.9", &fixture("resource_3_1.xml")])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("unknown DDMS version"));
}

#[test]
fn test_cli_convert_json_snapshot() {
    let output = Command::new(ddms_bin())
        .args(["convert", "--to", "4.1", "--json", &fixture("resource_3_1.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(json["titles"][0]["value"], "DDMSence");
}

// ============================================================================
// Versions Command Tests
// ============================================================================

#[test]
fn test_cli_versions() {
    let output = Command::new(ddms_bin())
        .args(["versions"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for version in ["2.0", "3.0", "3.1", "4.0.1", "4.1", "5.0"] {
        assert!(stdout.contains(&format!("DDMS {}", version)), "missing {}", version);
    }
    assert!(stdout.contains("urn:us:gov:ic:ntk"));
}
