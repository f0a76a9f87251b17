//! Lexical path normalization.
//!
//! Configuration entries are written relative to the project root, may start
//! with `~`, and may contain `.` or `..`. The helpers here turn them into
//! absolute paths without touching the filesystem, and render paths with
//! forward slashes for glob matching.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Replace a leading `~` with the user's home directory.
///
/// Only `~` and `~/rest` are understood. Paths that do not start with `~`
/// are returned unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] when the path is not valid UTF-8, when no
/// home directory is known, or for the `~name` form.
///
/// # Examples
///
/// ```
/// use quality_tools::paths::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/shared/rules")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("shared/rules"));
///
/// let untouched = expand_tilde(Path::new("packages/")).unwrap();
/// assert_eq!(untouched, Path::new("packages/"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: &str| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let text = path.to_str().ok_or_else(|| invalid("not valid UTF-8"))?;
    let Some(after_tilde) = text.strip_prefix('~') else {
        return Ok(path.to_path_buf());
    };

    let home = home::home_dir().ok_or_else(|| invalid("home directory is unknown"))?;
    if after_tilde.is_empty() {
        return Ok(home);
    }
    match after_tilde.strip_prefix(['/', '\\']) {
        Some(rest) => Ok(home.join(rest)),
        None => Err(invalid("only ~ and ~/ are expanded")),
    }
}

/// Drop `.` components and fold `..` into its parent.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] when a `..` would climb above the root.
///
/// # Examples
///
/// ```
/// use quality_tools::paths::normalize::resolve_components;
/// use std::path::{Path, PathBuf};
///
/// let resolved = resolve_components(Path::new("/srv/./app/../shared")).unwrap();
/// assert_eq!(resolved, PathBuf::from("/srv/shared"));
/// ```
pub fn resolve_components(path: &Path) -> Result<PathBuf> {
    let mut anchor = PathBuf::new();
    let mut segments: Vec<&std::ffi::OsStr> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component.as_os_str()),
            Component::CurDir => {}
            Component::Normal(segment) => segments.push(segment),
            Component::ParentDir => {
                if segments.pop().is_none() {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "'..' climbs above the root".to_string(),
                    });
                }
            }
        }
    }

    anchor.extend(segments);
    Ok(anchor)
}

/// Absolute, lexically clean form of `path`, with relative paths anchored
/// at `base`.
///
/// # Errors
///
/// Propagates failures from [`expand_tilde`] and [`resolve_components`].
///
/// # Examples
///
/// ```
/// use quality_tools::paths::normalize::normalize_against;
/// use std::path::Path;
///
/// let p = normalize_against(Path::new("../vendor"), Path::new("/srv/app/web")).unwrap();
/// assert_eq!(p, Path::new("/srv/app/vendor"));
/// ```
pub fn normalize_against(path: &Path, base: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        resolve_components(&expanded)
    } else {
        resolve_components(&base.join(expanded))
    }
}

/// Render `path` with `/` separators and no trailing slash.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;
    for component in path.components() {
        match component {
            Component::RootDir => absolute = true,
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => parts.push("..".to_string()),
            Component::Normal(c) => parts.push(c.to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilde_alone_is_home() {
        let home = home::home_dir().unwrap();
        assert_eq!(expand_tilde(Path::new("~")).unwrap(), home);
        assert_eq!(
            expand_tilde(Path::new("~/rules")).unwrap(),
            home.join("rules")
        );
    }

    #[test]
    fn test_tilde_with_user_name_rejected() {
        let err = expand_tilde(Path::new("~deploy/rules")).unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_parent_components_fold() {
        assert_eq!(
            resolve_components(Path::new("/a/b/../../c")).unwrap(),
            PathBuf::from("/c")
        );
        assert_eq!(
            resolve_components(Path::new("/a/..")).unwrap(),
            PathBuf::from("/")
        );
    }

    #[test]
    fn test_parent_above_root_rejected() {
        assert!(resolve_components(Path::new("/a/../..")).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_relative_entries_anchor_at_base() {
        let p = normalize_against(Path::new("./packages/site/"), Path::new("/project")).unwrap();
        assert_eq!(p, PathBuf::from("/project/packages/site"));
    }

    #[test]
    #[cfg(unix)]
    fn test_absolute_entries_ignore_base() {
        let p = normalize_against(Path::new("/opt/shared"), Path::new("/project")).unwrap();
        assert_eq!(p, PathBuf::from("/opt/shared"));
    }

    #[test]
    #[cfg(unix)]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("/a/b/")), "/a/b");
        assert_eq!(to_slash(Path::new("./a//b")), "a/b");
        assert_eq!(to_slash(Path::new("")), "");
    }

    #[cfg(unix)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn config_entry() -> impl Strategy<Value = String> {
            prop::collection::vec(
                prop_oneof![
                    Just(".".to_string()),
                    Just("..".to_string()),
                    "[a-z0-9_-]{1,8}",
                ],
                1..=8,
            )
            .prop_map(|parts| parts.join("/"))
        }

        proptest! {
            /// Output never contains `.` or `..`
            #[test]
            fn output_is_clean(entry in config_entry()) {
                if let Ok(p) = normalize_against(Path::new(&entry), Path::new("/app/web/deep")) {
                    prop_assert!(p.is_absolute());
                    prop_assert!(p
                        .components()
                        .all(|c| !matches!(c, Component::CurDir | Component::ParentDir)));
                }
            }

            /// A clean path normalizes to itself
            #[test]
            fn clean_paths_are_fixed_points(entry in config_entry()) {
                if let Ok(once) = normalize_against(Path::new(&entry), Path::new("/app")) {
                    let twice = normalize_against(&once, Path::new("/elsewhere")).unwrap();
                    prop_assert_eq!(once, twice);
                }
            }
        }
    }
}
