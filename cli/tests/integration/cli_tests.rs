//! Integration tests for the CLI structure and argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn bootstrap_gather() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bootstrap-gather"));
    cmd.env("NO_COLOR", "1").env_remove("GATHER_DIR").env_remove("RUST_LOG");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    bootstrap_gather()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_help_lists_gather_command() {
    bootstrap_gather()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("gather"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    bootstrap_gather()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bootstrap-gather"));
}

#[test]
fn test_gather_without_subcommand_shows_help() {
    bootstrap_gather()
        .arg("gather")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bootstrap"));
}

#[test]
fn test_gather_bootstrap_help_lists_flags() {
    bootstrap_gather()
        .args(["gather", "bootstrap", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bootstrap"))
        .stdout(predicate::str::contains("--master"))
        .stdout(predicate::str::contains("--key"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--timeout"));
}

// --- Argument validation tests ---

#[test]
fn test_master_with_shell_metacharacters_is_rejected() {
    bootstrap_gather()
        .args(["gather", "bootstrap", "--bootstrap", "10.0.0.5", "--master", "a;b"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid character"));
}

#[test]
fn test_empty_bootstrap_flag_is_rejected() {
    bootstrap_gather()
        .args(["gather", "bootstrap", "--bootstrap", "", "--master", "10.0.0.6"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_non_numeric_timeout_is_rejected() {
    bootstrap_gather()
        .args(["gather", "bootstrap", "--timeout", "soon"])
        .assert()
        .code(2);
}

#[test]
fn test_zero_timeout_is_rejected() {
    bootstrap_gather()
        .args(["gather", "bootstrap", "--timeout", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn test_unknown_log_level_is_rejected() {
    bootstrap_gather()
        .args(["--log-level", "loud", "gather", "bootstrap"])
        .assert()
        .code(2);
}
