//! End-to-end tests for the tabula binary.

use std::io::Write;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::{Builder, NamedTempFile, TempDir};

fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn scores() -> NamedTempFile {
    create_test_file("name,score\nAnn,9\nBen,4\nCy,7\n")
}

fn tabula() -> Command {
    Command::cargo_bin("tabula").expect("binary built")
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_load_prints_columns() {
    let file = scores();
    let output = tabula().arg("load").arg(file.path()).output().unwrap();

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["total_rows"], 3);
    assert_eq!(value["columns"][1]["inferred_type"], "integer");
}

#[test]
fn test_filter_with_symbol_operator() {
    let file = scores();
    let output = tabula()
        .args(["--compact", "filter"])
        .arg(file.path())
        .args(["score", ">=", "7"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["filtered_rows"], 2);
}

#[test]
fn test_sort_writes_output_file() {
    let file = scores();
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("sorted.json");

    tabula()
        .arg("sort")
        .arg(file.path())
        .args(["score", "--descending", "--output"])
        .arg(&destination)
        .assert()
        .success();

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&destination).unwrap()).unwrap();
    assert_eq!(written[0]["name"], "Ann");
}

#[test]
fn test_missing_column_exits_non_zero_with_payload() {
    let file = scores();
    let output = tabula()
        .arg("stats")
        .arg(file.path())
        .arg("wage")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["error_kind"], "column_not_found");
}

#[test]
fn test_call_by_tool_name() {
    let file = scores();
    let args = serde_json::json!({ "path": file.path(), "n": 1 }).to_string();
    let output = tabula()
        .args(["call", "get_data_sample", "--args", &args])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["data"].as_array().unwrap().len(), 1);
}

#[test]
fn test_serve_answers_each_line() {
    let file = scores();
    let input = format!(
        "{}\n\n{}\n",
        serde_json::json!({"tool": "analyze", "arguments": {"path": file.path()}}),
        serde_json::json!({"tool": "nope"}),
    );

    let output = tabula().arg("serve").write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let lines: Vec<Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["total_columns"], 2);
    assert_eq!(lines[1]["error_kind"], "invalid_argument");
}

#[test]
fn test_config_file_sets_default_sample_rows() {
    let file = scores();
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("tabula.json");
    std::fs::write(&config, r#"{"default_sample_rows": 2}"#).unwrap();

    let output = tabula()
        .arg("--config")
        .arg(&config)
        .arg("sample")
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["data"].as_array().unwrap().len(), 2);
}
