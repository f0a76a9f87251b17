//! Resolution of path specifications into directories.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paths::canonicalize::existing_dir;
use crate::paths::exclusion::{ExclusionSet, MatchCandidates};
use crate::paths::pattern::PathPattern;
use crate::paths::spec::{ResolvedPathSet, ToolPathSpec};
use crate::project::VendorDirectory;

/// Resolves [`ToolPathSpec`]s for one project, memoizing the results.
///
/// One scanner lives for one command invocation. Resolving the same spec
/// against the same vendor root twice returns the cached set without
/// touching the filesystem again.
///
/// # Examples
///
/// ```no_run
/// use quality_tools::paths::{PathScanner, ToolPathSpec};
/// use quality_tools::project::RootDetector;
/// use std::path::Path;
///
/// let detector = RootDetector::new();
/// let root = detector.detect_project_root(Path::new(".")).unwrap();
/// let vendor = detector.vendor_directory(&root);
///
/// let mut scanner = PathScanner::new(&root);
/// let spec = ToolPathSpec::new(vec!["packages/*".into()], vec!["vendor/".into()], vec![]);
/// for dir in &scanner.resolve(&spec, &vendor).unwrap() {
///     println!("{}", dir.display());
/// }
/// ```
#[derive(Debug)]
pub struct PathScanner {
    project_root: PathBuf,
    cache: HashMap<String, ResolvedPathSet>,
}

impl PathScanner {
    /// A scanner for the project at `project_root` (already canonical).
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            cache: HashMap::new(),
        }
    }

    /// The project root patterns are anchored at.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Number of memoized results.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Resolve `spec` into existing directories.
    ///
    /// 1. Expand every inclusion pattern in declaration order.
    /// 2. Drop duplicates by canonical path, keeping the first occurrence.
    /// 3. Drop paths matched by an exclusion pattern. Paths produced by an
    ///    exemption pattern are only tested against non-vendor rules.
    /// 4. Drop anything that is no longer a directory.
    /// 5. Memoize the result.
    ///
    /// An empty result is not an error; the caller decides what it means.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed patterns, and
    /// [`Error::VendorDirectoryNotFound`](crate::Error::VendorDirectoryNotFound)
    /// when a `vendor/` pattern is used and no vendor directory was detected.
    pub fn resolve(&mut self, spec: &ToolPathSpec, vendor: &VendorDirectory) -> Result<ResolvedPathSet> {
        let key = spec.cache_key(vendor.path());
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("path resolution served from cache ({} paths)", cached.len());
            return Ok(cached.clone());
        }

        let resolved = self.resolve_uncached(spec, vendor)?;
        self.cache.insert(key, resolved.clone());
        Ok(resolved)
    }

    fn resolve_uncached(&self, spec: &ToolPathSpec, vendor: &VendorDirectory) -> Result<ResolvedPathSet> {
        let exclusions = ExclusionSet::compile(&spec.exclude)?;

        let mut seen = HashSet::new();
        let mut expanded = Vec::new();
        for raw in &spec.include {
            let pattern = PathPattern::classify(raw, &self.project_root);
            let found = pattern.expand(&self.project_root, vendor)?;
            if found.is_empty() {
                log::debug!("pattern '{raw}' matched no directory");
            }
            for path in found {
                if seen.insert(path.clone()) {
                    expanded.push(path);
                }
            }
        }

        let mut exempt = HashSet::new();
        for raw in &spec.exemptions {
            let pattern = PathPattern::classify(raw, &self.project_root);
            exempt.extend(pattern.expand(&self.project_root, vendor)?);
        }

        let vendor_root = vendor.path();
        let paths = expanded
            .into_iter()
            .filter(|path| {
                let candidates = MatchCandidates::for_path(path, &self.project_root, vendor_root);
                match exclusions.matching_rule(&candidates, exempt.contains(path)) {
                    Some(rule) => {
                        log::debug!("excluding {} (matched '{}')", path.display(), rule.raw());
                        false
                    }
                    None => true,
                }
            })
            .filter(|path| existing_dir(path).is_some())
            .collect();

        Ok(ResolvedPathSet::new(paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        vendor: VendorDirectory,
    }

    fn fixture(dirs: &[&str]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        for d in dirs {
            fs::create_dir_all(root.join(d)).unwrap();
        }
        let vendor = if root.join("vendor").is_dir() {
            VendorDirectory::Detected(root.join("vendor"))
        } else {
            VendorDirectory::NotFound(vec!["vendor: does not exist".to_string()])
        };
        Fixture {
            _dir: dir,
            root,
            vendor,
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_exemption_asymmetry() {
        let f = fixture(&["vendor/cpsit/foo", "vendor/other/bar"]);
        let spec = ToolPathSpec::new(
            strings(&["vendor/cpsit/foo", "vendor/other/bar"]),
            strings(&["vendor/"]),
            strings(&["vendor/cpsit/foo"]),
        );

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(set.paths(), &[f.root.join("vendor/cpsit/foo")]);
    }

    #[test]
    fn test_exempt_path_still_honours_other_rules() {
        let f = fixture(&["vendor/cpsit/foo/Tests", "vendor/cpsit/foo/Classes"]);
        let spec = ToolPathSpec::new(
            strings(&["vendor/cpsit/foo/*"]),
            strings(&["vendor/", "Tests"]),
            strings(&["vendor/cpsit/foo/*"]),
        );

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(set.paths(), &[f.root.join("vendor/cpsit/foo/Classes")]);
    }

    #[test]
    fn test_vendor_namespace_expansion() {
        let f = fixture(&["vendor/cpsit/pkg-a", "vendor/cpsit/pkg-b", "vendor/acme/x"]);
        let spec = ToolPathSpec::new(strings(&["cpsit/*"]), vec![], vec![]);

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(
            set.paths(),
            &[
                f.root.join("vendor/cpsit/pkg-a"),
                f.root.join("vendor/cpsit/pkg-b")
            ]
        );
    }

    #[test]
    fn test_dedupes_keeping_first_occurrence() {
        let f = fixture(&["packages/a", "packages/b", "src"]);
        let spec = ToolPathSpec::new(
            strings(&["src/", "packages/*", "packages/a/", "./src"]),
            vec![],
            vec![],
        );

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(
            set.paths(),
            &[
                f.root.join("src"),
                f.root.join("packages/a"),
                f.root.join("packages/b")
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_duplicates_collapse() {
        use std::os::unix::fs::symlink;

        let f = fixture(&["packages/site"]);
        symlink(f.root.join("packages/site"), f.root.join("site-link")).unwrap();
        let spec = ToolPathSpec::new(strings(&["site-link", "packages/site"]), vec![], vec![]);

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(set.paths(), &[f.root.join("packages/site")]);
    }

    #[test]
    fn test_missing_paths_dropped() {
        let f = fixture(&["packages/a"]);
        fs::write(f.root.join("packages/file.txt"), "").unwrap();
        let spec = ToolPathSpec::new(
            strings(&["packages/missing", "packages/file.txt", "packages/a"]),
            vec![],
            vec![],
        );

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(set.paths(), &[f.root.join("packages/a")]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let f = fixture(&[]);
        let spec = ToolPathSpec::new(strings(&["packages/"]), vec![], vec![]);
        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_resolution_is_cached() {
        let f = fixture(&["packages/a", "packages/b"]);
        let spec = ToolPathSpec::new(strings(&["packages/*"]), vec![], vec![]);
        let mut scanner = PathScanner::new(&f.root);

        let first = scanner.resolve(&spec, &f.vendor).unwrap();
        fs::remove_dir(f.root.join("packages/b")).unwrap();
        let second = scanner.resolve(&spec, &f.vendor).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
        assert_eq!(scanner.cached_entries(), 1);

        // A fresh scanner sees the filesystem again.
        let fresh = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn test_different_specs_cached_separately() {
        let f = fixture(&["packages/a", "src"]);
        let mut scanner = PathScanner::new(&f.root);

        let a = scanner
            .resolve(&ToolPathSpec::single("packages/a"), &f.vendor)
            .unwrap();
        let b = scanner.resolve(&ToolPathSpec::single("src"), &f.vendor).unwrap();
        assert_ne!(a, b);
        assert_eq!(scanner.cached_entries(), 2);
    }

    #[test]
    fn test_missing_vendor_propagates_for_vendor_patterns() {
        let f = fixture(&["packages/a"]);
        let spec = ToolPathSpec::new(strings(&["packages/a", "vendor/cpsit/*"]), vec![], vec![]);

        let err = PathScanner::new(&f.root)
            .resolve(&spec, &f.vendor)
            .unwrap_err();
        assert!(matches!(err, Error::VendorDirectoryNotFound { .. }));
    }

    #[test]
    fn test_missing_glob_directory_without_vendor_is_empty() {
        let f = fixture(&["packages"]);
        let spec = ToolPathSpec::new(strings(&["packages/", "src/*"]), vec![], vec![]);

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(set.paths(), &[f.root.join("packages")]);
    }

    #[test]
    fn test_missing_vendor_is_fine_for_project_patterns() {
        let f = fixture(&["packages/a"]);
        let spec = ToolPathSpec::new(strings(&["packages/*"]), strings(&["vendor/"]), vec![]);

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_first_is_first_in_declaration_order() {
        let f = fixture(&["e", "d", "c", "b", "a"]);
        let spec = ToolPathSpec::new(strings(&["e", "d", "c", "b", "a"]), vec![], vec![]);

        let set = PathScanner::new(&f.root).resolve(&spec, &f.vendor).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.first(), Some(f.root.join("e").as_path()));
    }
}
