//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - A temporary project with `composer.json` and a vendor directory
//! - A command builder isolated from the caller's environment
//! - Fixture helpers for configuration files and fake tool binaries

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated project.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Canonical project root
    pub root: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a project with a minimal `composer.json` and an empty `vendor/`.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = fs::canonicalize(temp_dir.path()).expect("Failed to canonicalize temp dir");
        fs::write(root.join("composer.json"), "{}").expect("Failed to write composer.json");
        fs::create_dir(root.join("vendor")).expect("Failed to create vendor dir");
        Self { temp_dir, root }
    }

    /// Get a bare command builder, run from the project root.
    ///
    /// Environment variables the CLI reads are cleared so the caller's
    /// shell cannot leak into the test.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("qt").expect("Failed to find qt binary");
        cmd.current_dir(&self.root)
            .env_remove("QT_CONFIG")
            .env_remove("QT_PROJECT_ROOT")
            .env_remove("QT_LOG_MODE")
            .env_remove("COMPOSER_VENDOR_DIR");
        cmd
    }

    /// Command builder that ignores the user's global configuration.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--no-global-config");
        cmd
    }

    /// Absolute path below the project root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Create directories below the project root.
    pub fn create_dirs(&self, dirs: &[&str]) -> &Self {
        for dir in dirs {
            fs::create_dir_all(self.root.join(dir)).expect("Failed to create test directory");
        }
        self
    }

    /// Write a file below the project root.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write the project configuration file.
    pub fn config(&self, yaml: &str) -> PathBuf {
        self.write(".quality-tools.yaml", yaml)
    }

    /// Install an executable script as `vendor/bin/<name>`.
    ///
    /// The script prints its arguments, one per line, and exits with `code`.
    #[cfg(unix)]
    pub fn fake_tool(&self, name: &str, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = format!("#!/bin/sh\nfor arg in \"$@\"; do echo \"$arg\"; done\nexit {code}\n");
        let path = self.write(&format!("vendor/bin/{name}"), &script);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        path
    }

    /// Display form of a path, as the CLI prints it.
    pub fn display(path: &Path) -> String {
        path.display().to_string()
    }
}

/// Stdout of a finished command as a string.
#[allow(dead_code)]
pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("Invalid UTF-8 in output")
}
