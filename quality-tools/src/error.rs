//! Error types for the quality-tools library.
//!
//! This module provides the error hierarchy for configuration resolution and
//! path discovery, using `thiserror` for ergonomic error handling. Every error
//! belongs to exactly one [`ErrorKind`], and every kind owns its process exit
//! code, so callers decide the exit status in one place.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::validator::ValidationReport;

/// Result type alias for operations that may fail with a quality-tools error.
///
/// # Examples
///
/// ```
/// use quality_tools::{Error, Result};
///
/// fn example_operation() -> Result<u8> {
///     Ok(6)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the quality-tools library.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration file could not be parsed or is structurally broken.
    #[error("{}", format_configuration(file.as_ref(), key.as_deref(), message))]
    Configuration {
        /// The file the problem originates from, if any.
        file: Option<PathBuf>,
        /// Dotted key path of the offending entry, when known.
        key: Option<String>,
        /// A description of the problem.
        message: String,
    },

    /// A `${NAME}` reference had no value and no default.
    #[error("{}", format_missing_variable(variable, file.as_ref(), key.as_deref()))]
    MissingVariable {
        /// Name of the unresolved environment variable.
        variable: String,
        /// The file containing the reference.
        file: Option<PathBuf>,
        /// Dotted key path the reference appears under, when it can be located.
        key: Option<String>,
    },

    /// The merged configuration failed schema validation.
    #[error("invalid configuration:\n{0}")]
    Validation(ValidationReport),

    /// A required path does not exist.
    #[error("path not found: {}", path.display())]
    PathNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A path exists but is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// A path exists but is not a regular file.
    #[error("not a file: {}", path.display())]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },

    /// Permission denied accessing a path.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// Every vendor directory detection strategy failed.
    #[error("vendor directory not found; attempted:\n{}", format_attempts(attempted))]
    VendorDirectoryNotFound {
        /// One human-readable line per strategy that was tried.
        attempted: Vec<String>,
    },

    /// A glob or exclusion pattern could not be compiled.
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written in the configuration.
        pattern: String,
        /// The compiler's message.
        reason: String,
    },

    /// A tool name is not one of the known tools.
    #[error("unknown tool '{name}'")]
    UnknownTool {
        /// The name that was given.
        name: String,
    },

    /// The tool does not support the requested action.
    #[error("{tool} does not support '{action}'")]
    UnsupportedAction {
        /// Tool name.
        tool: String,
        /// Requested action.
        action: String,
    },

    /// An external tool could not be started.
    #[error("failed to run '{program}': {source}")]
    Process {
        /// The program that was spawned.
        program: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad error category, each with a designated process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed files, unresolved variables, schema violations.
    Configuration,
    /// A required path is missing or has the wrong type.
    FileSystem,
    /// No vendor directory could be located.
    VendorDirectoryNotFound,
    /// An external process could not be executed.
    Process,
}

impl ErrorKind {
    /// Exit code the command-line front end uses for this kind.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Configuration => 3,
            Self::FileSystem => 4,
            Self::VendorDirectoryNotFound => 5,
            Self::Process => 6,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration error"),
            Self::FileSystem => write!(f, "file system error"),
            Self::VendorDirectoryNotFound => write!(f, "vendor directory not found"),
            Self::Process => write!(f, "process error"),
        }
    }
}

impl Error {
    /// The category this error belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use quality_tools::{Error, ErrorKind};
    /// use std::path::PathBuf;
    ///
    /// let err = Error::PathNotFound { path: PathBuf::from("/nonexistent") };
    /// assert_eq!(err.kind(), ErrorKind::FileSystem);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. }
            | Self::MissingVariable { .. }
            | Self::Validation(_)
            | Self::InvalidPattern { .. }
            | Self::UnknownTool { .. }
            | Self::UnsupportedAction { .. } => ErrorKind::Configuration,
            Self::PathNotFound { .. }
            | Self::NotADirectory { .. }
            | Self::NotAFile { .. }
            | Self::PermissionDenied { .. }
            | Self::InvalidPath { .. }
            | Self::Io(_) => ErrorKind::FileSystem,
            Self::VendorDirectoryNotFound { .. } => ErrorKind::VendorDirectoryNotFound,
            Self::Process { .. } => ErrorKind::Process,
        }
    }

    /// Shorthand for `self.kind().exit_code()`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }

    /// Check if error indicates a path does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }

    /// Attach the originating file to configuration-level errors that lack one.
    #[must_use]
    pub fn in_file(self, path: &std::path::Path) -> Self {
        match self {
            Self::MissingVariable { variable, file: None, key } => Self::MissingVariable {
                variable,
                file: Some(path.to_path_buf()),
                key,
            },
            Self::Configuration { file: None, key, message } => Self::Configuration {
                file: Some(path.to_path_buf()),
                key,
                message,
            },
            other => other,
        }
    }
}

fn format_configuration(file: Option<&PathBuf>, key: Option<&str>, message: &str) -> String {
    let mut out = String::from("configuration error");
    if let Some(file) = file {
        out.push_str(&format!(" in {}", file.display()));
    }
    if let Some(key) = key {
        out.push_str(&format!(" at '{key}'"));
    }
    out.push_str(": ");
    out.push_str(message);
    out
}

fn format_missing_variable(variable: &str, file: Option<&PathBuf>, key: Option<&str>) -> String {
    let mut out = format!("environment variable '{variable}' is not set and has no default");
    if let Some(file) = file {
        out.push_str(&format!(" (referenced in {}", file.display()));
        if let Some(key) = key {
            out.push_str(&format!(" at '{key}'"));
        }
        out.push(')');
    }
    out
}

fn format_attempts(attempted: &[String]) -> String {
    attempted
        .iter()
        .map(|a| format!("  - {a}"))
        .collect::<Vec<_>>()
        .join("\n")
}
