//! Common test utilities for integration tests.
//!
//! [`Project`] builds a throwaway project directory with a `composer.json`,
//! an optional vendor directory, and whatever files a test needs.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary project on disk.
///
/// `root` is canonical, so it compares equal to resolved paths.
pub struct Project {
    _dir: TempDir,
    /// Canonical project root.
    pub root: PathBuf,
}

#[allow(dead_code)]
impl Project {
    /// An empty project with a minimal `composer.json`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::write(root.join("composer.json"), "{}").unwrap();
        Self { _dir: dir, root }
    }

    /// Create directories relative to the root.
    pub fn dirs(self, dirs: &[&str]) -> Self {
        for d in dirs {
            fs::create_dir_all(self.root.join(d)).unwrap();
        }
        self
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    /// Write `.quality-tools.yaml`.
    pub fn config(self, yaml: &str) -> Self {
        self.file(".quality-tools.yaml", yaml)
    }

    /// Absolute path of `relative`.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// The root as a `&Path`.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
