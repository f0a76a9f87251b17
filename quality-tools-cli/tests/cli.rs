//! Basic CLI surface: help, version and completions.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lint"))
        .stdout(predicate::str::contains("fix"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("paths"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let env = TestEnv::new();
    env.command().assert().failure().code(2);
}

#[test]
fn test_unknown_tool_is_usage_error() {
    let env = TestEnv::new();
    env.command()
        .args(["lint", "psalm"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("psalm"));
}

#[test]
fn test_completions_bash() {
    let env = TestEnv::new();
    env.command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("qt"));
}

#[test]
fn test_completions_quiet_suppresses_hints() {
    let env = TestEnv::new();
    env.command()
        .args(["--quiet", "completions", "zsh"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
