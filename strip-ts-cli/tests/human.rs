use assert_cmd::Command;
use std::time::Duration;

fn strip_ts_cli() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("strip-ts-cli")
}

fn stderr_of(assert: &assert_cmd::assert::Assert) -> String {
  String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

#[test]
fn human_mode_writes_output_to_stdout() {
  let assert = strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin("let x: number = 1;")
    .assert()
    .success()
    .code(0);

  assert_eq!(
    String::from_utf8_lossy(&assert.get_output().stdout),
    "let x         = 1;"
  );
  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    stderr_of(&assert)
  );
}

#[test]
fn human_mode_points_at_syntax_errors() {
  let assert = strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin("let ok = 1;\nlet x = ;")
    .assert()
    .failure()
    .code(1);

  assert!(
    assert.get_output().stdout.is_empty(),
    "expected stdout to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stdout)
  );
  let stderr = stderr_of(&assert);
  assert!(stderr.starts_with("<stdin>:2:"), "unexpected stderr: {stderr}");
  assert!(stderr.contains("\nlet x = ;\n"), "missing source line: {stderr}");
  assert!(stderr.trim_end().ends_with('^'), "missing caret: {stderr}");
}

#[test]
fn tsx_flag_enables_jsx() {
  strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .arg("--tsx")
    .write_stdin("const el = <b>{n as number}</b>;")
    .assert()
    .success()
    .stdout("const el = <b>{n          }</b>;");
}

#[test]
fn asi_hazards_are_reported_on_request() {
  let assert = strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .arg("--warn-asi")
    .write_stdin("let a = b as C\n(d)")
    .assert()
    .success();

  assert_eq!(
    String::from_utf8_lossy(&assert.get_output().stdout),
    "let a = b     \n(d)"
  );
  let stderr = stderr_of(&assert);
  assert!(stderr.starts_with("<stdin>:2:0: warning:"), "unexpected stderr: {stderr}");
}

#[test]
fn files_in_and_out() {
  let dir = std::env::temp_dir().join(format!("strip-ts-cli-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let input = dir.join("in.ts");
  let output = dir.join("out.js");
  std::fs::write(&input, "function f(a?: string) {}\n").unwrap();

  strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .arg("-i")
    .arg(&input)
    .arg("-o")
    .arg(&output)
    .assert()
    .success()
    .stdout("");

  assert_eq!(
    std::fs::read_to_string(&output).unwrap(),
    "function f(a         ) {}\n"
  );
  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invalid_utf8_is_rejected() {
  let assert = strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin(vec![b'l', b'e', b't', b' ', 0xff, b';'])
    .assert()
    .failure()
    .code(1);

  assert!(stderr_of(&assert).contains("not valid UTF-8"));
}

#[test]
fn trace_flag_logs_to_stderr() {
  let assert = strip_ts_cli()
    .timeout(Duration::from_secs(5))
    .env("RUST_LOG", "debug")
    .arg("--trace")
    .write_stdin("let x: number = 1;")
    .assert()
    .success();

  assert_eq!(
    String::from_utf8_lossy(&assert.get_output().stdout),
    "let x         = 1;"
  );
  let stderr = stderr_of(&assert);
  assert!(stderr.contains("stripping"), "missing trace output: {stderr}");
  assert!(stderr.contains("strip_types"), "missing library span: {stderr}");
}
