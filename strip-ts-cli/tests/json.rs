use assert_cmd::Command;
use serde_json::Value;
use std::time::Duration;

fn strip_ts_cli() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("strip-ts-cli")
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  serde_json::from_str(&stdout).expect("stdout to be valid JSON")
}

#[test]
fn json_success_contains_schema_version_and_output() {
  let assert = strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .write_stdin("let x: number = 1;")
    .assert()
    .success()
    .code(0);

  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );

  let value = stdout_json(&assert);
  assert_eq!(value["schema_version"], 1);
  assert_eq!(value["output"], "let x         = 1;");
  assert_eq!(value["asi_hazards"], Value::Array(Vec::new()));
}

#[test]
fn json_success_lists_asi_hazards() {
  let assert = strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .write_stdin("let a = b as C\n(d)")
    .assert()
    .success();

  let value = stdout_json(&assert);
  let hazards = value["asi_hazards"].as_array().expect("hazard array");
  assert_eq!(hazards.len(), 1);
  assert_eq!(hazards[0]["line"], 2);
  assert_eq!(hazards[0]["col"], 0);
  assert_eq!(hazards[0]["next"], 15);
}

#[test]
fn json_error_contains_diagnostics_array() {
  let assert = strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .write_stdin("function {")
    .assert()
    .failure()
    .code(1);

  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );

  let value = stdout_json(&assert);
  assert_eq!(value["schema_version"], 1);
  let diagnostics = value
    .get("diagnostics")
    .and_then(|value| value.as_array())
    .expect("expected diagnostics array");
  assert_eq!(diagnostics.len(), 1);
  assert_eq!(diagnostics[0]["line"], 1);
  assert!(diagnostics[0]["message"].as_str().is_some_and(|m| !m.is_empty()));
}
