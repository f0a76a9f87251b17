//! Exclusion pattern matching.
//!
//! A resolved directory is tested in up to three spellings: its absolute
//! path, its path relative to the project root, and `vendor/<rest>` when it
//! lives inside the vendor directory. Relative patterns are tested against
//! the relative spellings only; absolute patterns against the absolute one.
//!
//! Plain patterns match whole path segments, anywhere in the path, so
//! `node_modules/` drops `packages/site/node_modules/pkg` but not
//! `packages/node_modules_docs`. Glob patterns are compiled with `globset`
//! and also match when they match any ancestor of the path.

use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use crate::error::{Error, Result};
use crate::paths::normalize::to_slash;
use crate::paths::pattern::has_glob_chars;

/// The spellings of one path that exclusion patterns are tested against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidates {
    absolute: String,
    relative: Vec<String>,
}

impl MatchCandidates {
    /// Spellings of `path` for the given project and vendor roots.
    #[must_use]
    pub fn for_path(path: &Path, project_root: &Path, vendor_root: Option<&Path>) -> Self {
        let mut relative = Vec::new();
        if let Ok(rest) = path.strip_prefix(project_root) {
            relative.push(to_slash(rest));
        }
        if let Some(rest) = vendor_root.and_then(|v| path.strip_prefix(v).ok()) {
            let spelled = format!("vendor/{}", to_slash(rest));
            if !relative.contains(&spelled) {
                relative.push(spelled);
            }
        }

        Self {
            absolute: to_slash(path),
            relative,
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Segments(Vec<String>),
    Glob(GlobMatcher),
}

/// One compiled exclusion pattern.
#[derive(Debug, Clone)]
pub struct ExclusionRule {
    raw: String,
    absolute: bool,
    targets_vendor: bool,
    matcher: Matcher,
}

impl ExclusionRule {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if a glob does not compile.
    pub fn compile(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        let absolute = trimmed.starts_with('/');
        let mut body = trimmed.trim_end_matches('/');
        while let Some(stripped) = body.strip_prefix("./") {
            body = stripped;
        }

        let matcher = if has_glob_chars(body) {
            let glob = GlobBuilder::new(body)
                .literal_separator(true)
                .build()
                .map_err(|e| Error::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.kind().to_string(),
                })?;
            Matcher::Glob(glob.compile_matcher())
        } else {
            Matcher::Segments(
                body.split('/')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        };

        Ok(Self {
            raw: pattern.to_string(),
            absolute,
            targets_vendor: is_vendor_exclusion(body),
            matcher,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether this is a generic "skip the vendor directory" rule.
    #[must_use]
    pub fn targets_vendor(&self) -> bool {
        self.targets_vendor
    }

    /// Whether the rule matches any spelling in `candidates`.
    #[must_use]
    pub fn matches(&self, candidates: &MatchCandidates) -> bool {
        if self.absolute {
            self.matches_spelling(&candidates.absolute, true)
        } else {
            candidates
                .relative
                .iter()
                .any(|spelling| self.matches_spelling(spelling, false))
        }
    }

    fn matches_spelling(&self, spelling: &str, anchored: bool) -> bool {
        let segments: Vec<&str> = spelling.split('/').filter(|s| !s.is_empty()).collect();
        match &self.matcher {
            Matcher::Segments(pattern) => {
                if pattern.is_empty() || pattern.len() > segments.len() {
                    return false;
                }
                if anchored {
                    segments.iter().zip(pattern).all(|(a, b)| a == b)
                } else {
                    segments
                        .windows(pattern.len())
                        .any(|window| window.iter().zip(pattern).all(|(a, b)| a == b))
                }
            }
            Matcher::Glob(glob) => {
                let lead = if anchored { "/" } else { "" };
                (1..=segments.len())
                    .any(|n| glob.is_match(format!("{lead}{}", segments[..n].join("/"))))
            }
        }
    }
}

/// `vendor`, `vendor/`, `vendor/*` and `vendor/**`.
fn is_vendor_exclusion(body: &str) -> bool {
    matches!(body, "vendor" | "vendor/*" | "vendor/**")
}

/// An ordered set of exclusion rules.
///
/// # Examples
///
/// ```
/// use quality_tools::paths::exclusion::{ExclusionSet, MatchCandidates};
/// use std::path::Path;
///
/// let set = ExclusionSet::compile(&["vendor/".to_string(), "**/Tests".to_string()]).unwrap();
/// let root = Path::new("/app");
/// let vendor = Some(Path::new("/app/vendor"));
///
/// let pkg = MatchCandidates::for_path(Path::new("/app/vendor/cpsit/foo"), root, vendor);
/// assert!(set.is_excluded(&pkg, false));
/// assert!(!set.is_excluded(&pkg, true));
///
/// let tests = MatchCandidates::for_path(Path::new("/app/vendor/cpsit/Tests"), root, vendor);
/// assert!(set.is_excluded(&tests, true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    rules: Vec<ExclusionRule>,
}

impl ExclusionSet {
    /// Compile every pattern.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::InvalidPattern`].
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let rules = patterns
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| ExclusionRule::compile(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// The first rule that drops the path, if any.
    ///
    /// For exempt paths the generic vendor rules are skipped; every other
    /// rule still applies.
    #[must_use]
    pub fn matching_rule(&self, candidates: &MatchCandidates, exempt: bool) -> Option<&ExclusionRule> {
        self.rules
            .iter()
            .filter(|rule| !(exempt && rule.targets_vendor()))
            .find(|rule| rule.matches(candidates))
    }

    /// Whether the path is dropped.
    #[must_use]
    pub fn is_excluded(&self, candidates: &MatchCandidates, exempt: bool) -> bool {
        self.matching_rule(candidates, exempt).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(path: &str) -> MatchCandidates {
        MatchCandidates::for_path(
            Path::new(path),
            Path::new("/app"),
            Some(Path::new("/app/vendor")),
        )
    }

    fn rule(pattern: &str) -> ExclusionRule {
        ExclusionRule::compile(pattern).unwrap()
    }

    #[test]
    fn test_candidates_spellings() {
        let c = candidates("/app/vendor/cpsit/foo");
        assert_eq!(c.absolute, "/app/vendor/cpsit/foo");
        assert_eq!(c.relative, vec!["vendor/cpsit/foo"]);

        let outside = MatchCandidates::for_path(
            Path::new("/srv/vendor/cpsit/foo"),
            Path::new("/srv/app"),
            Some(Path::new("/srv/vendor")),
        );
        assert_eq!(outside.relative, vec!["vendor/cpsit/foo"]);
    }

    #[test]
    fn test_plain_pattern_matches_segments() {
        let r = rule("node_modules/");
        assert!(r.matches(&candidates("/app/node_modules/x")));
        assert!(r.matches(&candidates("/app/packages/site/node_modules")));
        assert!(!r.matches(&candidates("/app/packages/node_modules_docs")));
    }

    #[test]
    fn test_multi_segment_plain_pattern() {
        let r = rule("config/sites/legacy");
        assert!(r.matches(&candidates("/app/config/sites/legacy/x")));
        assert!(!r.matches(&candidates("/app/config/sites/main")));
    }

    #[test]
    fn test_relative_pattern_ignores_absolute_prefix() {
        // The project itself lives below a directory called `var`.
        let c = MatchCandidates::for_path(
            Path::new("/var/www/app/packages"),
            Path::new("/var/www/app"),
            None,
        );
        assert!(!rule("var/").matches(&c));
    }

    #[test]
    fn test_absolute_pattern() {
        let r = rule("/app/packages/legacy");
        assert!(r.matches(&candidates("/app/packages/legacy/Classes")));
        assert!(!r.matches(&candidates("/app/other/app/packages/legacy")));
    }

    #[test]
    fn test_glob_pattern_matches_ancestors() {
        let r = rule("packages/legacy-*");
        assert!(r.matches(&candidates("/app/packages/legacy-news/Classes")));
        assert!(!r.matches(&candidates("/app/packages/news")));

        let deep = rule("**/Tests");
        assert!(deep.matches(&candidates("/app/packages/news/Tests/Unit")));
    }

    #[test]
    fn test_vendor_rule_detection() {
        assert!(rule("vendor").targets_vendor());
        assert!(rule("vendor/").targets_vendor());
        assert!(rule("./vendor/**").targets_vendor());
        assert!(!rule("vendor/cpsit/legacy").targets_vendor());
        assert!(!rule("var/").targets_vendor());
    }

    #[test]
    fn test_exemption_only_skips_vendor_rules() {
        let set = ExclusionSet::compile(&[
            "vendor/".to_string(),
            "vendor/cpsit/legacy".to_string(),
        ])
        .unwrap();

        assert!(!set.is_excluded(&candidates("/app/vendor/cpsit/foo"), true));
        assert!(set.is_excluded(&candidates("/app/vendor/cpsit/foo"), false));
        assert_eq!(
            set.matching_rule(&candidates("/app/vendor/cpsit/legacy"), true)
                .map(ExclusionRule::raw),
            Some("vendor/cpsit/legacy")
        );
    }

    #[test]
    fn test_invalid_glob() {
        let err = ExclusionSet::compile(&["packages/[a".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
