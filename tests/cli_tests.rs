//! Integration tests for the taskfile2d2 CLI
//!
//! These tests run the actual binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const TASKFILE: &str = r#"
version: '3'
includes:
  infra: ./infra
tasks:
  build:
    desc: Build the app
    cmds:
      - go build ./...
  deploy:
    internal: true
    deps: [build]
    cmds:
      - task: infra:provision
        vars:
          region: us-east
"#;

/// Get the binary to test
fn cli() -> Command {
    Command::cargo_bin("taskfile2d2").unwrap()
}

#[test]
fn test_help_flag() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("D2 diagram"))
        .stdout(predicate::str::contains("--no-legend"));
}

#[test]
fn test_file_to_default_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("Taskfile.yml");
    fs::write(&input, TASKFILE).unwrap();

    cli().arg(&input).assert().success().stdout(predicate::str::is_empty());

    let d2 = fs::read_to_string(temp_dir.path().join("Taskfile.yml.d2")).unwrap();
    assert!(d2.contains("'deploy' -> 'build': calls as dependency"));
    assert!(d2.contains("'infra'.'provision'.icon: ${unknownTaskIcon}"));
    assert!(d2.contains("'build'.Text: |md"));
}

#[test]
fn test_file_to_named_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("Taskfile.yml");
    let output = temp_dir.path().join("diagram.d2");
    fs::write(&input, TASKFILE).unwrap();

    cli().arg(&input).arg(&output).assert().success();

    let d2 = fs::read_to_string(&output).unwrap();
    assert!(d2.starts_with("vars: {"));
    assert!(d2.contains("gen-1: Legend {"));
    assert!(!temp_dir.path().join("Taskfile.yml.d2").exists());
}

#[test]
fn test_stdin_to_stdout() {
    cli()
        .write_stdin(TASKFILE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("vars: {"))
        .stdout(predicate::str::contains("'deploy'.icon: ${internalTaskIcon}"))
        .stdout(predicate::str::contains("'build'.icon: ${externalTaskIcon}"));
}

#[test]
fn test_no_legend_flag() {
    cli()
        .arg("--no-legend")
        .write_stdin(TASKFILE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Legend {").not());
}

#[test]
fn test_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "legend = false\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin(TASKFILE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Legend {").not())
        .stdout(predicate::str::contains("gen-1 -> 'infra'.'provision'"));
}

#[test]
fn test_unsupported_version_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("Taskfile.yml");
    fs::write(&input, "version: '2'\ntasks: {}\n").unwrap();

    cli()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Only version 3 Taskfiles are supported"))
        .stderr(predicate::str::contains("Fix:"));

    assert!(!temp_dir.path().join("Taskfile.yml.d2").exists());
}

#[test]
fn test_cmd_and_cmds_fails() {
    cli()
        .write_stdin("version: '3'\ntasks:\n  x:\n    cmd: a\n    cmds: [b]\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot have both cmd and cmds"));
}

#[test]
fn test_missing_input_file_fails() {
    cli()
        .arg("does-not-exist.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}
