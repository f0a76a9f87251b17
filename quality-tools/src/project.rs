//! Project root and vendor directory detection.
//!
//! The project root is the directory that holds `composer.json`. The vendor
//! directory is where Composer installs packages; it is found with several
//! strategies, tried in order:
//!
//! 1. the install path Composer reports (`COMPOSER_VENDOR_DIR`), injected by
//!    the caller;
//! 2. `config.vendor-dir` in `composer.json`;
//! 3. the fallbacks `vendor`, `../vendor` and `../../vendor`.
//!
//! Every returned path is canonical so that later string comparisons are
//! stable across symlinks.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths::canonicalize::{canonicalize_dir, existing_dir};
use crate::paths::normalize::normalize_against;

/// Manifest file marking a project root.
pub const MANIFEST_FILE: &str = "composer.json";

/// Vendor locations tried last, relative to the project root.
pub const FALLBACK_VENDOR_DIRS: &[&str] = &["vendor", "../vendor", "../../vendor"];

/// Result of vendor directory detection.
///
/// Detection failing is only an error for patterns that need the vendor
/// directory, so the scanner carries the outcome instead of failing early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorDirectory {
    /// Canonical path of the detected directory.
    Detected(PathBuf),
    /// Every strategy failed; one line per attempt.
    NotFound(Vec<String>),
}

impl VendorDirectory {
    /// The detected path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Detected(path) => Some(path),
            Self::NotFound(_) => None,
        }
    }

    /// The detected path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VendorDirectoryNotFound`] listing every attempt.
    pub fn require(&self) -> Result<&Path> {
        match self {
            Self::Detected(path) => Ok(path),
            Self::NotFound(attempted) => Err(Error::VendorDirectoryNotFound {
                attempted: attempted.clone(),
            }),
        }
    }
}

/// Locates the project root and the vendor directory.
///
/// Both overrides are passed in explicitly; nothing here reads the process
/// environment.
///
/// # Examples
///
/// ```no_run
/// use quality_tools::project::RootDetector;
/// use std::path::Path;
///
/// let detector = RootDetector::new();
/// let root = detector.detect_project_root(Path::new(".")).unwrap();
/// let vendor = detector.detect_vendor_directory(&root).unwrap();
/// println!("{} -> {}", root.display(), vendor.display());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RootDetector {
    root_override: Option<PathBuf>,
    installed_vendor_dir: Option<PathBuf>,
}

impl RootDetector {
    /// A detector with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the project root instead of searching for it.
    #[must_use]
    pub fn with_root_override(mut self, root: Option<PathBuf>) -> Self {
        self.root_override = root;
        self
    }

    /// The vendor path reported by the package manager, if any.
    ///
    /// Relative values are taken relative to the project root.
    #[must_use]
    pub fn with_installed_vendor_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.installed_vendor_dir = dir;
        self
    }

    /// Find the project root.
    ///
    /// With an override, that directory is used as is. Otherwise the nearest
    /// ancestor of `start` (inclusive) holding `composer.json` wins, falling
    /// back to `start` itself.
    ///
    /// # Errors
    ///
    /// Returns a file-system error if the override or `start` is not an
    /// existing directory.
    pub fn detect_project_root(&self, start: &Path) -> Result<PathBuf> {
        if let Some(root) = &self.root_override {
            log::debug!("project root pinned to {}", root.display());
            return canonicalize_dir(root);
        }

        let start = canonicalize_dir(start)?;
        let root = start
            .ancestors()
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
            .map_or_else(|| start.clone(), Path::to_path_buf);
        log::debug!("project root detected at {}", root.display());
        Ok(root)
    }

    /// Find the vendor directory, recording every failed attempt.
    #[must_use]
    pub fn vendor_directory(&self, project_root: &Path) -> VendorDirectory {
        let mut attempted = Vec::new();

        match &self.installed_vendor_dir {
            Some(dir) => match Self::check_candidate(dir, project_root) {
                Ok(found) => return VendorDirectory::Detected(found),
                Err(reason) => attempted.push(format!("COMPOSER_VENDOR_DIR ({}): {reason}", dir.display())),
            },
            None => attempted.push("COMPOSER_VENDOR_DIR: not set".to_string()),
        }

        match Self::manifest_vendor_dir(project_root) {
            Ok(dir) => match Self::check_candidate(&dir, project_root) {
                Ok(found) => return VendorDirectory::Detected(found),
                Err(reason) => attempted.push(format!(
                    "{MANIFEST_FILE} config.vendor-dir ({}): {reason}",
                    dir.display()
                )),
            },
            Err(reason) => attempted.push(format!("{MANIFEST_FILE} config.vendor-dir: {reason}")),
        }

        for fallback in FALLBACK_VENDOR_DIRS {
            match Self::check_candidate(Path::new(fallback), project_root) {
                Ok(found) => return VendorDirectory::Detected(found),
                Err(reason) => attempted.push(format!(
                    "{}: {reason}",
                    project_root.join(fallback).display()
                )),
            }
        }

        log::debug!("vendor directory not found after {} attempts", attempted.len());
        VendorDirectory::NotFound(attempted)
    }

    /// Find the vendor directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VendorDirectoryNotFound`] enumerating every strategy
    /// that was tried.
    pub fn detect_vendor_directory(&self, project_root: &Path) -> Result<PathBuf> {
        self.vendor_directory(project_root)
            .require()
            .map(Path::to_path_buf)
    }

    fn check_candidate(dir: &Path, project_root: &Path) -> std::result::Result<PathBuf, String> {
        let absolute = normalize_against(dir, project_root).map_err(|e| e.to_string())?;
        if !absolute.exists() {
            return Err("does not exist".to_string());
        }
        existing_dir(&absolute).ok_or_else(|| "not a directory".to_string())
    }

    fn manifest_vendor_dir(project_root: &Path) -> std::result::Result<PathBuf, String> {
        let manifest = project_root.join(MANIFEST_FILE);
        let text = fs::read_to_string(&manifest).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => "no manifest".to_string(),
            _ => format!("cannot read manifest: {e}"),
        })?;
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {e}"))?;
        json.get("config")
            .and_then(|c| c.get("vendor-dir"))
            .and_then(serde_json::Value::as_str)
            .map(PathBuf::from)
            .ok_or_else(|| "not configured".to_string())
    }
}
