//! Tests for `qt config validate` and `qt config show`.

mod common;

use common::{stdout_of, TestEnv};
use predicates::prelude::*;

#[test]
fn test_validate_defaults() {
    let env = TestEnv::new();
    env.command()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_validate_verbose_lists_sources() {
    let env = TestEnv::new();
    env.config("quality-tools:\n  project:\n    name: site\n");

    env.command()
        .args(["--verbose", "config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".quality-tools.yaml"));
}

#[test]
fn test_validate_reports_dotted_paths() {
    let env = TestEnv::new();
    env.config("quality-tools:\n  tools:\n    phpstan:\n      level: 12\n  output:\n    verbosity: loud\n");

    env.command()
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains(format!(
            "{}: quality-tools.tools.phpstan.level",
            TestEnv::display(&env.path(".quality-tools.yaml"))
        )))
        .stderr(predicate::str::contains("quality-tools.output.verbosity"));
}

#[test]
fn test_validate_single_file() {
    let env = TestEnv::new();
    let file = env.write(
        "ci/quality.yaml",
        "quality-tools:\n  tools:\n    phpstan:\n      level: 3\n",
    );

    env.command()
        .args(["config", "validate"])
        .arg(&file)
        .assert()
        .success();
}

#[test]
fn test_validate_missing_file() {
    let env = TestEnv::new();
    env.command()
        .args(["config", "validate", "nope.yaml"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_validate_malformed_yaml() {
    let env = TestEnv::new();
    env.config("quality-tools:\n  project:\n    name: \"unterminated\n");

    env.command()
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains(".quality-tools.yaml"));
}

#[test]
fn test_show_yaml_merges_project_file() {
    let env = TestEnv::new();
    env.config("quality-tools:\n  tools:\n    phpstan:\n      level: 4\n");

    env.command()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quality-tools:"))
        .stdout(predicate::str::contains("level: 4"))
        .stdout(predicate::str::contains("memory_limit: 1G"));
}

#[test]
fn test_show_json() {
    let env = TestEnv::new();
    let output = env
        .command()
        .args(["config", "show", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["quality-tools"]["tools"]["phpstan"]["level"], 6);
    assert_eq!(value["quality-tools"]["project"]["php_version"], "8.3");
}

#[test]
fn test_show_reports_missing_variable() {
    let env = TestEnv::new();
    env.config("quality-tools:\n  project:\n    name: ${QT_TEST_UNSET_PROJECT_NAME}\n");

    env.command()
        .env_remove("QT_TEST_UNSET_PROJECT_NAME")
        .args(["config", "show"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("QT_TEST_UNSET_PROJECT_NAME"));
}
