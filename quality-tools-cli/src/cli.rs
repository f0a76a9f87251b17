//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, ConfigCommand, PathsCommand, RunCommand};
use crate::utils::GlobalOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Uniform front end for PHP quality tools.
#[derive(Parser)]
#[command(name = "qt")]
#[command(version, about = "Run PHP quality tools with one shared configuration", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Configuration file to use instead of the project file
    #[arg(long, value_name = "PATH", global = true, env = "QT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run against this directory instead of the configured paths
    #[arg(long, value_name = "PATH", global = true)]
    pub path: Option<PathBuf>,

    /// Project root (skips detection)
    #[arg(long, value_name = "PATH", global = true, env = "QT_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Vendor directory reported by Composer
    #[arg(long, value_name = "PATH", global = true, env = "COMPOSER_VENDOR_DIR")]
    pub vendor_dir: Option<PathBuf>,

    /// Ignore the user configuration file
    #[arg(long, global = true)]
    pub no_global_config: bool,

    /// Disable colored tool output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Global options for command handlers.
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            verbose: self.verbose,
            quiet: self.quiet,
            config: self.config.clone(),
            path: self.path.clone(),
            project_root: self.project_root.clone(),
            vendor_dir: self.vendor_dir.clone(),
            no_global_config: self.no_global_config,
            no_color: self.no_color,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Check code with a tool without changing files
    Lint(RunCommand),

    /// Let a tool fix code in place
    Fix(RunCommand),

    /// Validate or print the configuration
    Config(ConfigCommand),

    /// Print the directories a tool would run against
    Paths(PathsCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use quality_tools::Tool;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lint_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from(["qt", "lint", "phpstan", "--dry-run", "--no-color"]).unwrap();
        assert!(cli.no_color);
        match cli.command {
            Command::Lint(cmd) => {
                assert_eq!(cmd.tool, Tool::Phpstan);
                assert!(cmd.dry_run);
            }
            _ => panic!("expected lint"),
        }
    }

    #[test]
    fn test_unknown_tool_rejected() {
        assert!(Cli::try_parse_from(["qt", "lint", "psalm"]).is_err());
    }
}
