#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # quality-tools
//!
//! Configuration resolution and scan-path discovery for PHP quality tools.
//!
//! This library merges layered configuration (package defaults, a user file,
//! a project file, and command-line overrides), validates it, and resolves
//! the directories each tool should analyse, including packages that live in
//! the Composer vendor directory.
//!
//! ## Core Types
//!
//! - [`ConfigBuilder`] and [`Configuration`]: Loading and querying settings
//! - [`RootDetector`]: Project root and vendor directory detection
//! - [`PathScanner`], [`ToolPathSpec`] and [`ResolvedPathSet`]: Path resolution
//! - [`ToolCommand`] and [`InvocationPlan`]: Tool command lines
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```no_run
//! use quality_tools::{ConfigBuilder, PathScanner, RootDetector, Tool};
//! use std::path::Path;
//!
//! let detector = RootDetector::new();
//! let root = detector.detect_project_root(Path::new(".")).unwrap();
//! let vendor = detector.vendor_directory(&root);
//!
//! let config = ConfigBuilder::new().with_project_root(&root).build().unwrap();
//! let spec = config.tool_path_spec(Tool::Phpstan);
//! let paths = PathScanner::new(&root).resolve(&spec, &vendor).unwrap();
//! for dir in &paths {
//!     println!("{}", dir.display());
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod project;
pub mod tools;

// Re-export key types at crate root for convenience
pub use config::{CliOverrides, ConfigBuilder, Configuration, Tool, Verbosity};
pub use error::{Error, ErrorKind, Result};
pub use logging::{apply_configured_level, init_logger, resolve_log_level, LogLevel, Logger};
pub use paths::{PathScanner, ResolvedPathSet, ToolPathSpec};
pub use project::{RootDetector, VendorDirectory};
pub use tools::{Action, Execution, InvocationPlan, ProcessRunner, Runner, ToolCommand};
