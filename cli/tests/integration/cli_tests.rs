//! Integration tests for the CLI surface and early input validation.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn agentpod() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentpod"));
    cmd.env("NO_COLOR", "1").env_remove("AGENTPOD_LOG");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    agentpod().assert().code(2).stderr(predicate::str::contains(
        "Per-workspace containers for AI coding agents",
    ));
}

#[test]
fn test_no_color_one_is_accepted() {
    agentpod()
        .env("NO_COLOR", "1")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("agentpod v0.1.0"))
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_no_color_true_is_accepted() {
    agentpod()
        .env("NO_COLOR", "true")
        .args(["--json", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn test_no_color_flag_still_works() {
    agentpod()
        .env_remove("NO_COLOR")
        .args(["--no-color", "version"])
        .assert()
        .success();
}

#[test]
fn test_cli_help_lists_every_command() {
    let assert = agentpod().arg("--help").assert().success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for cmd in ["run", "shell", "exec", "resolve", "stop", "rm", "config", "version"] {
        assert!(out.contains(cmd), "help is missing {cmd}:\n{out}");
    }
}

#[test]
fn test_version_command_shows_version() {
    agentpod()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("agentpod v0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let assert = agentpod().args(["version", "--json"]).assert().success();
    let doc: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    assert_eq!(doc["version"], "0.1.0");
}

#[test]
fn test_resolve_help_shows_mode_values() {
    agentpod()
        .args(["resolve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("shell"));
}

// --- Validation before any runtime call ---

#[test]
fn test_exec_without_command_exits_one() {
    agentpod()
        .arg("exec")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exec requires a command"));
}

#[test]
fn test_exec_without_command_json_error_shape() {
    let assert = agentpod().args(["exec", "--json"]).assert().code(1);
    let doc: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    assert_eq!(doc["error"], true);
    assert_eq!(doc["code"], "invalid_input");
}

#[test]
fn test_invalid_container_name_is_rejected() {
    agentpod()
        .args(["shell", "--container=bad name"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid container name"));
}

#[test]
fn test_container_with_reset_is_rejected() {
    agentpod()
        .args(["shell", "--container", "box", "--reset"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--reset"));
}

#[test]
fn test_invalid_memory_limit_is_rejected() {
    agentpod()
        .args(["run", "--memory", "lots", "--", "true"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid memory limit"));
}

#[test]
fn test_empty_workspace_is_rejected() {
    agentpod()
        .args(["resolve", "--workspace", "  "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("workspace path is empty"));
}
