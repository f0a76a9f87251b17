//! Configuration system for quality-tools.
//!
//! This module provides hierarchical configuration with support for:
//! - YAML and JSON configuration files (global user file and project file)
//! - `${NAME}` / `${NAME:-default}` environment interpolation in file text
//! - Command-line overrides via the builder
//! - Validation that reports every problem at once
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line overrides (via `ConfigBuilder::with_overrides`)
//! 2. Project config (`.quality-tools.yaml`, or the file given with `--config`)
//! 3. User config (`~/.quality-tools.yaml`)
//! 4. Built-in defaults
//!
//! Scalars from higher sources replace lower ones. The path lists under
//! `paths.{scan,exclude,additional}` accumulate instead, unless a source
//! writes `{ replace: [...] }`.
//!
//! # Examples
//!
//! Loading from a specific directory:
//!
//! ```no_run
//! use quality_tools::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_project_root(Path::new("/path/to/project"))
//!     .build()
//!     .unwrap();
//! ```
//!
//! Defaults only:
//!
//! ```
//! use quality_tools::config::ConfigBuilder;
//! use quality_tools::Tool;
//!
//! let config = ConfigBuilder::new().skip_files().build().unwrap();
//! assert!(config.is_tool_enabled(Tool::Phpstan));
//! assert_eq!(config.phpstan_level(), 6);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod model;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types at module root
pub use builder::{CliOverrides, ConfigBuilder};
pub use environment::{interpolate, EnvSource, MapEnv, ProcessEnv};
pub use loader::{ConfigFormat, ConfigLoader, ConfigSource, SourceKind};
pub use merger::ConfigMerger;
pub use model::Configuration;
pub use schema::{IndentStyle, Tool, Verbosity};
pub use validator::{ConfigValidator, ValidationIssue, ValidationReport};
