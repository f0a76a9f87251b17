//! Inclusion pattern classification and expansion.
//!
//! An inclusion pattern is one of three things:
//!
//! - a plain path (`packages/site_package/`), relative to the project root
//!   or absolute;
//! - a glob (`packages/*/Classes`), expanded against the filesystem;
//! - a vendor namespace (`cpsit/*`), which expands to every package the
//!   namespace has installed in the vendor directory, or to nothing when
//!   there is no vendor directory.
//!
//! Patterns that start with `vendor/` are anchored at the detected vendor
//! directory rather than at a literal `vendor` folder, so a relocated
//! vendor directory keeps working.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};
use crate::paths::canonicalize::existing_dir;
use crate::paths::normalize::expand_tilde;
use crate::project::VendorDirectory;

/// Characters that turn a pattern into a glob.
pub const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Prefix that anchors a pattern at the vendor directory.
pub const VENDOR_PREFIX: &str = "vendor/";

/// Whether `pattern` contains any glob metacharacter.
#[must_use]
pub fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains(GLOB_CHARS)
}

/// The namespace of a `<namespace>/*` pattern, checked syntactically.
///
/// # Examples
///
/// ```
/// use quality_tools::paths::pattern::namespace_of;
///
/// assert_eq!(namespace_of("cpsit/*"), Some("cpsit"));
/// assert_eq!(namespace_of("packages/*/Classes"), None);
/// assert_eq!(namespace_of("src/"), None);
/// ```
#[must_use]
pub fn namespace_of(pattern: &str) -> Option<&str> {
    let namespace = pattern.trim().strip_suffix("/*")?;
    let valid = !namespace.is_empty()
        && !namespace.contains('/')
        && !namespace.starts_with('.')
        && !namespace.starts_with('~')
        && !has_glob_chars(namespace);
    valid.then_some(namespace)
}

/// Whether `pattern` points into the vendor directory, judged from its text.
///
/// True for `vendor/...` patterns and for `<namespace>/*` patterns. The
/// latter may still turn out to name a project directory; the scanner
/// decides that against the filesystem.
#[must_use]
pub fn is_vendor_pattern(pattern: &str) -> bool {
    let trimmed = strip_dot_slash(pattern.trim());
    trimmed.starts_with(VENDOR_PREFIX) || namespace_of(trimmed).is_some()
}

fn strip_dot_slash(pattern: &str) -> &str {
    let mut rest = pattern;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest
}

/// What a pattern turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// A single path.
    Plain,
    /// A filesystem glob.
    Glob,
    /// Every package below a vendor namespace.
    VendorNamespace {
        /// The namespace directory name.
        namespace: String,
    },
}

/// Directory a pattern is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The project root.
    Project,
    /// The detected vendor directory.
    Vendor,
    /// None; the pattern is absolute.
    Absolute,
}

/// A classified inclusion pattern.
///
/// # Examples
///
/// ```
/// use quality_tools::paths::pattern::{Anchor, PathPattern, PatternKind};
/// use std::path::Path;
///
/// let p = PathPattern::classify("vendor/cpsit/*", Path::new("/nonexistent"));
/// assert_eq!(p.anchor(), Anchor::Vendor);
/// assert_eq!(p.kind(), &PatternKind::Glob);
///
/// let p = PathPattern::classify("cpsit/*", Path::new("/nonexistent"));
/// assert!(matches!(p.kind(), PatternKind::VendorNamespace { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    body: String,
    kind: PatternKind,
    anchor: Anchor,
}

impl PathPattern {
    /// Classify `raw` for a project rooted at `project_root`.
    ///
    /// A `<namespace>/*` pattern is a vendor namespace only when the project
    /// has no directory of that name; otherwise it is an ordinary glob.
    #[must_use]
    pub fn classify(raw: &str, project_root: &Path) -> Self {
        let trimmed = strip_dot_slash(raw.trim());

        let (anchor, body) = if let Some(rest) = trimmed.strip_prefix(VENDOR_PREFIX) {
            (Anchor::Vendor, rest)
        } else if trimmed.starts_with('~') || Path::new(trimmed).is_absolute() {
            (Anchor::Absolute, trimmed)
        } else {
            (Anchor::Project, trimmed)
        };
        let body = body.trim_end_matches('/');

        let kind = match namespace_of(body) {
            Some(namespace)
                if anchor == Anchor::Project && !project_root.join(namespace).is_dir() =>
            {
                PatternKind::VendorNamespace {
                    namespace: namespace.to_string(),
                }
            }
            _ if has_glob_chars(body) => PatternKind::Glob,
            _ => PatternKind::Plain,
        };

        Self {
            raw: raw.to_string(),
            body: body.to_string(),
            kind,
            anchor,
        }
    }

    /// The pattern as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Classification result.
    #[must_use]
    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    /// What the pattern is relative to.
    #[must_use]
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Whether this pattern looks into the vendor directory.
    ///
    /// Only `vendor/` patterns fail when no vendor directory was detected; a
    /// namespace pattern then expands to nothing.
    #[must_use]
    pub fn needs_vendor(&self) -> bool {
        self.anchor == Anchor::Vendor || matches!(self.kind, PatternKind::VendorNamespace { .. })
    }

    /// Expand into canonical, existing directories in a stable order.
    ///
    /// Globs yield their matches sorted by path. Missing plain paths expand
    /// to nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VendorDirectoryNotFound`] for a `vendor/` pattern when
    /// no vendor directory was detected, and [`Error::InvalidPattern`] for
    /// malformed globs.
    pub fn expand(&self, project_root: &Path, vendor: &VendorDirectory) -> Result<Vec<PathBuf>> {
        let base = match self.anchor {
            Anchor::Project => project_root.to_path_buf(),
            Anchor::Vendor => vendor.require()?.to_path_buf(),
            Anchor::Absolute => PathBuf::new(),
        };

        match &self.kind {
            PatternKind::Plain => {
                let path = if self.anchor == Anchor::Absolute {
                    expand_tilde(Path::new(&self.body))?
                } else {
                    base.join(&self.body)
                };
                Ok(existing_dir(&path).into_iter().collect())
            }
            PatternKind::Glob => {
                let body = if self.anchor == Anchor::Absolute {
                    expand_tilde(Path::new(&self.body))?
                        .to_string_lossy()
                        .into_owned()
                } else {
                    self.body.clone()
                };
                self.expand_glob(&base, &body)
            }
            PatternKind::VendorNamespace { namespace } => {
                // Without a vendor directory this is just a project glob
                // whose directory is missing.
                let Some(vendor_root) = vendor.path() else {
                    log::debug!("'{}' matches nothing: no such directory and no vendor", self.raw);
                    return Ok(Vec::new());
                };
                self.expand_glob(vendor_root, &format!("{}/*", Pattern::escape(namespace)))
            }
        }
    }

    fn expand_glob(&self, base: &Path, body: &str) -> Result<Vec<PathBuf>> {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };

        let prefix = if base.as_os_str().is_empty() {
            String::new()
        } else {
            format!("{}/", Pattern::escape(&base.to_string_lossy()))
        };

        let mut found = Vec::new();
        for alternative in expand_braces(body) {
            let full = format!("{prefix}{alternative}");
            let entries = glob::glob_with(&full, options).map_err(|e| Error::InvalidPattern {
                pattern: self.raw.clone(),
                reason: e.msg.to_string(),
            })?;
            let mut matches: Vec<PathBuf> = entries
                .filter_map(std::result::Result::ok)
                .filter_map(|p| existing_dir(&p))
                .collect();
            matches.sort();
            found.extend(matches);
        }

        Ok(found)
    }
}

/// Expand `{a,b}` alternatives, which the glob engine does not support.
///
/// Alternatives are expanded left to right; nesting is not supported.
///
/// # Examples
///
/// ```
/// use quality_tools::paths::pattern::expand_braces;
///
/// assert_eq!(
///     expand_braces("packages/{site,theme}/Classes"),
///     vec!["packages/site/Classes", "packages/theme/Classes"]
/// );
/// assert_eq!(expand_braces("plain/"), vec!["plain/"]);
/// ```
#[must_use]
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let Some(close) = pattern[open..].find('}').map(|i| open + i) else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    pattern[open + 1..close]
        .split(',')
        .flat_map(|alternative| {
            expand_braces(tail)
                .into_iter()
                .map(move |rest| format!("{head}{alternative}{rest}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_has_glob_chars() {
        assert!(has_glob_chars("packages/*"));
        assert!(has_glob_chars("a?b"));
        assert!(has_glob_chars("[ab]"));
        assert!(has_glob_chars("{a,b}"));
        assert!(!has_glob_chars("packages/site/"));
    }

    #[test]
    fn test_vendor_pattern_detection() {
        assert!(is_vendor_pattern("cpsit/*"));
        assert!(is_vendor_pattern("vendor/acme/theme"));
        assert!(is_vendor_pattern("./vendor/acme/theme"));
        assert!(!is_vendor_pattern("packages/"));
        assert!(!is_vendor_pattern("packages/*/Classes"));
        assert!(!is_vendor_pattern("*/*"));
    }

    #[test]
    fn test_namespace_with_project_dir_is_glob() {
        let (_dir, root) = project();
        fs::create_dir(root.join("packages")).unwrap();

        let p = PathPattern::classify("packages/*", &root);
        assert_eq!(p.kind(), &PatternKind::Glob);
        assert!(!p.needs_vendor());

        let p = PathPattern::classify("cpsit/*", &root);
        assert!(p.needs_vendor());
    }

    #[test]
    fn test_classify_anchors() {
        let root = Path::new("/nonexistent");
        assert_eq!(PathPattern::classify("src/", root).anchor(), Anchor::Project);
        assert_eq!(PathPattern::classify("./src", root).anchor(), Anchor::Project);
        assert_eq!(PathPattern::classify("vendor/a/b", root).anchor(), Anchor::Vendor);
        assert_eq!(PathPattern::classify("~/shared", root).anchor(), Anchor::Absolute);
        #[cfg(unix)]
        assert_eq!(PathPattern::classify("/opt/x", root).anchor(), Anchor::Absolute);
    }

    #[test]
    fn test_expand_plain_existing_and_missing() {
        let (_dir, root) = project();
        fs::create_dir_all(root.join("packages/site")).unwrap();
        let vendor = VendorDirectory::NotFound(vec![]);

        let found = PathPattern::classify("packages/site/", &root)
            .expand(&root, &vendor)
            .unwrap();
        assert_eq!(found, vec![root.join("packages/site")]);

        let missing = PathPattern::classify("packages/missing", &root)
            .expand(&root, &vendor)
            .unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_expand_glob_sorted_directories_only() {
        let (_dir, root) = project();
        for name in ["b", "a", "c"] {
            fs::create_dir_all(root.join("packages").join(name).join("Classes")).unwrap();
        }
        fs::write(root.join("packages/readme.md"), "").unwrap();
        let vendor = VendorDirectory::NotFound(vec![]);

        let found = PathPattern::classify("packages/*", &root)
            .expand(&root, &vendor)
            .unwrap();
        assert_eq!(
            found,
            vec![
                root.join("packages/a"),
                root.join("packages/b"),
                root.join("packages/c")
            ]
        );

        let classes = PathPattern::classify("packages/{c,a}/Classes", &root)
            .expand(&root, &vendor)
            .unwrap();
        assert_eq!(
            classes,
            vec![
                root.join("packages/c/Classes"),
                root.join("packages/a/Classes")
            ]
        );
    }

    #[test]
    fn test_expand_vendor_namespace() {
        let (_dir, root) = project();
        fs::create_dir_all(root.join("vendor/cpsit/pkg-b")).unwrap();
        fs::create_dir_all(root.join("vendor/cpsit/pkg-a")).unwrap();
        fs::create_dir_all(root.join("vendor/other/pkg")).unwrap();
        let vendor = VendorDirectory::Detected(root.join("vendor"));

        let found = PathPattern::classify("cpsit/*", &root)
            .expand(&root, &vendor)
            .unwrap();
        assert_eq!(
            found,
            vec![root.join("vendor/cpsit/pkg-a"), root.join("vendor/cpsit/pkg-b")]
        );
    }

    #[test]
    fn test_vendor_prefix_anchors_at_detected_vendor() {
        let (_dir, root) = project();
        fs::create_dir_all(root.join("libs/acme/theme")).unwrap();
        let vendor = VendorDirectory::Detected(root.join("libs"));

        let found = PathPattern::classify("vendor/acme/theme/", &root)
            .expand(&root, &vendor)
            .unwrap();
        assert_eq!(found, vec![root.join("libs/acme/theme")]);
    }

    #[test]
    fn test_vendor_prefix_without_vendor_fails() {
        let (_dir, root) = project();
        let vendor = VendorDirectory::NotFound(vec!["vendor: does not exist".to_string()]);

        let err = PathPattern::classify("vendor/cpsit/*", &root)
            .expand(&root, &vendor)
            .unwrap_err();
        assert!(matches!(err, Error::VendorDirectoryNotFound { .. }));
    }

    #[test]
    fn test_namespace_without_vendor_expands_to_nothing() {
        let (_dir, root) = project();
        let vendor = VendorDirectory::NotFound(vec!["vendor: does not exist".to_string()]);

        let found = PathPattern::classify("src/*", &root)
            .expand(&root, &vendor)
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_invalid_glob_reported() {
        let (_dir, root) = project();
        let vendor = VendorDirectory::NotFound(vec![]);
        let err = PathPattern::classify("packages/[a", &root)
            .expand(&root, &vendor)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_expand_braces_multiple_groups() {
        assert_eq!(
            expand_braces("{a,b}/{x,y}"),
            vec!["a/x", "a/y", "b/x", "b/y"]
        );
        assert_eq!(expand_braces("unclosed{a"), vec!["unclosed{a"]);
    }
}
