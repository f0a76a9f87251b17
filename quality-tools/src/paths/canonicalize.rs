//! Path canonicalization functions.
//!
//! Every directory the scanner hands out is canonical: absolute, with
//! symlinks resolved. Exclusion and exemption matching compare these strings,
//! so a symlinked vendor directory and its target must end up identical.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Canonicalize a path by following symlinks.
///
/// The path must exist for canonicalization to succeed.
///
/// # Errors
///
/// Returns an error if:
/// - The path does not exist (`PathNotFound`)
/// - Permission is denied (`PermissionDenied`)
/// - An I/O error occurs
///
/// # Examples
///
/// ```no_run
/// use quality_tools::paths::canonicalize::canonicalize;
/// use std::path::Path;
///
/// let canonical = canonicalize(Path::new("/tmp")).unwrap();
/// assert!(canonical.is_absolute());
/// ```
pub fn canonicalize(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::PathNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => Error::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })
}

/// Canonicalize a path that must be an existing directory.
///
/// # Errors
///
/// Returns `PathNotFound` if the path is missing and `NotADirectory` if it
/// exists but is something else.
pub fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = canonicalize(path)?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(Error::NotADirectory {
            path: path.to_path_buf(),
        })
    }
}

/// The canonical form of `path` if it is an existing directory.
///
/// Missing paths, files and unreadable entries all yield `None`; the scanner
/// silently drops those.
#[must_use]
pub fn existing_dir(path: &Path) -> Option<PathBuf> {
    if !path.is_dir() {
        return None;
    }
    fs::canonicalize(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_canonicalize_nonexistent() {
        let result = canonicalize(Path::new("/nonexistent/path/xyz"));
        assert!(matches!(result.unwrap_err(), Error::PathNotFound { .. }));
    }

    #[test]
    fn test_canonicalize_dir_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("composer.json");
        fs::write(&file, "{}").unwrap();

        assert!(matches!(
            canonicalize_dir(&file).unwrap_err(),
            Error::NotADirectory { .. }
        ));
        assert_eq!(
            canonicalize_dir(dir.path()).unwrap(),
            fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_existing_dir() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(existing_dir(dir.path()).is_some());
        assert!(existing_dir(&file).is_none());
        assert!(existing_dir(&dir.path().join("missing")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_canonicalize_symlink() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");

        fs::create_dir(&target).unwrap();
        symlink(&target, &link).unwrap();

        assert_eq!(
            existing_dir(&link).unwrap(),
            fs::canonicalize(&target).unwrap()
        );
    }
}
