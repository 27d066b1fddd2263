//! Binary integration tests for the `glyco` command
//!
//! Every test runs in its own temporary directory with `HOME` pointed there,
//! so no user configuration leaks in.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use assert_cmd::Command;
use tempfile::TempDir;

const USER_ID: &str = "abcdef0123";
const UPLOAD_ID: &str = "0123456789abcdef0123456789abcdef";

fn glyco(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_glyco"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("GLYCO_CONFIG")
        .env_remove("GLYCO_ORIGIN")
        .env_remove("GLYCO_OUTPUT_FORMAT")
        .env_remove("GLYCO_USER_ID")
        .env_remove("GLYCO_UPLOAD_ID")
        .env_remove("GLYCO_GROUP_ID")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn write(dir: &TempDir, name: &str, value: &Value) -> String {
    std::fs::write(dir.path().join(name), value.to_string()).unwrap();
    name.to_string()
}

fn basal() -> Value {
    json!({"type": "basal", "deliveryType": "scheduled", "rate": 1.75, "duration": 28800000})
}

#[test]
fn test_clean_batch_exits_zero() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "batch.json", &json!([basal(), basal()]));

    glyco(dir.path())
        .args(["validate", &input, "--user-id", USER_ID, "--upload-id", UPLOAD_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ 2 of 2 record(s) accepted"));
}

#[test]
fn test_unknown_type_exits_with_rejection_code() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "batch.json", &json!([basal(), {"type": "bogus"}]));

    glyco(dir.path())
        .args(["validate", &input, "--user-id", USER_ID, "--upload-id", UPLOAD_ID])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("/1/type"))
        .stdout(predicate::str::contains("type-unknown"))
        .stderr(predicate::str::contains("1 error(s) reported, 1 record(s) accepted"));
}

#[test]
fn test_json_report_lists_pointers() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "batch.json", &json!([basal()]));

    let assert = glyco(dir.path())
        .args(["-o", "json", "validate", &input])
        .assert()
        .code(2);

    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["accepted"], json!(0));
    let sources: Vec<&str> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|error| error["source"].as_str())
        .collect();
    assert!(sources.contains(&"/0/_userId"), "{:?}", sources);
    assert!(sources.contains(&"/0/uploadId"), "{:?}", sources);
}

#[test]
fn test_records_are_printed_on_request() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "one.json", &basal());

    let assert = glyco(dir.path())
        .args(["-o", "json", "validate", &input, "--records"])
        .args(["--user-id", USER_ID, "--upload-id", UPLOAD_ID])
        .assert()
        .success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["submitted"], json!(1));
    assert_eq!(report["records"][0]["type"], json!("basal"));
    assert_eq!(report["records"][0]["rate"], json!(1.75));
}

#[test]
fn test_yaml_input_and_configured_context() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".glyco.yaml"),
        format!("ingestion:\n  user_id: {}\n  upload_id: {}\n", USER_ID, UPLOAD_ID),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("batch.yaml"),
        "- type: water\n  amount:\n    units: liters\n    value: 0.5\n",
    )
    .unwrap();

    glyco(dir.path())
        .args(["validate", "batch.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ 1 of 1 record(s) accepted"));
}

#[test]
fn test_missing_and_malformed_inputs() {
    let dir = TempDir::new().unwrap();

    glyco(dir.path())
        .args(["validate", "absent.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("File not found"));

    std::fs::write(dir.path().join("broken.json"), "[{\"type\":").unwrap();
    glyco(dir.path())
        .args(["validate", "broken.json"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Invalid JSON input"));
}

#[test]
fn test_stdin_input() {
    let dir = TempDir::new().unwrap();

    glyco(dir.path())
        .args(["validate", "-", "--user-id", USER_ID, "--upload-id", UPLOAD_ID])
        .write_stdin(basal().to_string())
        .assert()
        .success();
}

#[test]
fn test_types_listing() {
    let dir = TempDir::new().unwrap();

    glyco(dir.path())
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("blob   │ open"))
        .stdout(predicate::str::contains("wizard"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();

    glyco(dir.path())
        .args(["config", "init", ".glyco.toml"])
        .assert()
        .success();
    assert!(dir.path().join(".glyco.toml").exists());

    glyco(dir.path())
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"origin\": \"external\""));
}
