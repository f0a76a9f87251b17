//! Scan-path discovery.
//!
//! Turns the path patterns of a configuration into the concrete, existing
//! directories a tool is run against.
//!
//! # Key Concepts
//!
//! ## Patterns
//!
//! Inclusion patterns are plain paths, globs, or vendor namespaces
//! (`cpsit/*`). Patterns starting with `vendor/` are anchored at the detected
//! vendor directory. See [`pattern`].
//!
//! ## Exclusions and exemptions
//!
//! Exclusion patterns drop resolved directories. A directory produced by an
//! exemption pattern (an explicit vendor include) is not dropped by the
//! generic `vendor/` exclusion, but every other exclusion still applies.
//! See [`exclusion`].
//!
//! ## Canonical paths
//!
//! Every resolved directory is canonical, so symlinked duplicates collapse
//! and comparisons are stable.
//!
//! # Examples
//!
//! ```no_run
//! use quality_tools::paths::{PathScanner, ToolPathSpec};
//! use quality_tools::project::RootDetector;
//! use std::path::Path;
//!
//! let detector = RootDetector::new();
//! let root = detector.detect_project_root(Path::new(".")).unwrap();
//! let vendor = detector.vendor_directory(&root);
//!
//! let spec = ToolPathSpec::new(
//!     vec!["packages/".into(), "cpsit/*".into()],
//!     vec!["vendor/".into(), "node_modules/".into()],
//!     vec!["cpsit/*".into()],
//! );
//! let resolved = PathScanner::new(&root).resolve(&spec, &vendor).unwrap();
//! println!("{} directories", resolved.len());
//! ```

pub mod canonicalize;
pub mod exclusion;
pub mod normalize;
pub mod pattern;
pub mod scanner;
pub mod spec;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types
pub use exclusion::{ExclusionRule, ExclusionSet, MatchCandidates};
pub use pattern::{PathPattern, PatternKind};
pub use scanner::PathScanner;
pub use spec::{ResolvedPathSet, ToolPathSpec};
