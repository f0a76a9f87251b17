//! CLI-specific error types with exit codes.
//!
//! This module wraps library errors and adds the conditions only the
//! command-line front end knows about, each with its exit code.

use quality_tools::{Error as LibError, Tool};
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Path resolution produced nothing for the tool to work on.
    NothingToScan {
        /// The tool that was asked to run.
        tool: Tool,
    },

    /// The tool ran and reported failure.
    ToolFailed {
        /// The tool that ran.
        tool: Tool,
        /// Its exit code.
        code: i32,
    },

    /// I/O error.
    Io(std::io::Error),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 1: Nothing to scan
    /// - 2: Invalid arguments (reported by clap before any command runs)
    /// - 3: Configuration error
    /// - 4: File system error
    /// - 5: Vendor directory not found
    /// - 6: External process could not be started
    /// - otherwise: the failing tool's own exit code
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(e) => e.exit_code(),
            CliError::NothingToScan { .. } => 1,
            CliError::ToolFailed { code, .. } => *code,
            CliError::Io(_) => quality_tools::ErrorKind::FileSystem.exit_code(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::NothingToScan { tool } => {
                write!(f, "nothing to scan for {tool}: no configured path exists")
            }
            CliError::ToolFailed { tool, code } => write!(f, "{tool} exited with status {code}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
