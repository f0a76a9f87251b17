//! Path specifications and their resolved form.

use std::path::{Path, PathBuf};

/// What a tool should scan, before touching the filesystem.
///
/// All three lists keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ToolPathSpec {
    /// Inclusion patterns: plain paths, globs and vendor namespaces.
    pub include: Vec<String>,
    /// Exclusion patterns.
    pub exclude: Vec<String>,
    /// Patterns whose expansions survive generic vendor exclusion.
    pub exemptions: Vec<String>,
}

impl ToolPathSpec {
    /// Bundle the three lists.
    #[must_use]
    pub fn new(include: Vec<String>, exclude: Vec<String>, exemptions: Vec<String>) -> Self {
        Self {
            include,
            exclude,
            exemptions,
        }
    }

    /// A spec that scans exactly one path, with no exclusions.
    ///
    /// Used for `--path`.
    #[must_use]
    pub fn single(path: impl Into<String>) -> Self {
        Self::new(vec![path.into()], Vec::new(), Vec::new())
    }

    /// Stable cache key for this spec resolved against `vendor_root`.
    ///
    /// The key is a JSON rendering of the lists and the vendor root, so it is
    /// identical across runs for identical input.
    ///
    /// # Examples
    ///
    /// ```
    /// use quality_tools::paths::ToolPathSpec;
    /// use std::path::Path;
    ///
    /// let spec = ToolPathSpec::single("packages/");
    /// let key = spec.cache_key(Some(Path::new("/app/vendor")));
    /// assert_eq!(key, spec.clone().cache_key(Some(Path::new("/app/vendor"))));
    /// assert_ne!(key, spec.cache_key(None));
    /// ```
    #[must_use]
    pub fn cache_key(&self, vendor_root: Option<&Path>) -> String {
        serde_json::json!({
            "include": self.include,
            "exclude": self.exclude,
            "exemptions": self.exemptions,
            "vendor": vendor_root.map(|p| p.to_string_lossy()),
        })
        .to_string()
    }
}

/// The directories a tool will be pointed at.
///
/// Ordered, free of duplicates, and every entry was an existing canonical
/// directory when it was resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPathSet {
    paths: Vec<PathBuf>,
}

impl ResolvedPathSet {
    /// Wrap already resolved paths.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// All paths, in order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The first path, for callers that take a single target.
    ///
    /// # Examples
    ///
    /// ```
    /// use quality_tools::paths::ResolvedPathSet;
    /// use std::path::PathBuf;
    ///
    /// let set = ResolvedPathSet::new((1..=5).map(|i| PathBuf::from(format!("/p{i}"))).collect());
    /// assert_eq!(set.first(), Some(PathBuf::from("/p1").as_path()));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when nothing survived resolution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the paths.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }
}

impl<'a> IntoIterator for &'a ResolvedPathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
