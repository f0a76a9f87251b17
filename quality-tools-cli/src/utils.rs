//! Shared plumbing for CLI commands.
//!
//! Every command that needs a configuration goes through
//! [`ProjectContext::load`], which detects the project, merges the
//! configuration with the command-line overrides, and owns the path scanner
//! for the rest of the invocation.

use crate::error::CliError;
use quality_tools::config::CliOverrides;
use quality_tools::paths::canonicalize::canonicalize_dir;
use quality_tools::{
    apply_configured_level, ConfigBuilder, Configuration, PathScanner, ResolvedPathSet,
    RootDetector, Tool, Verbosity, VendorDirectory,
};
use std::env;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Configuration file replacing project-file discovery.
    pub config: Option<PathBuf>,

    /// Single directory to run against instead of the configured paths.
    pub path: Option<PathBuf>,

    /// Pinned project root.
    pub project_root: Option<PathBuf>,

    /// Vendor directory reported by Composer.
    pub vendor_dir: Option<PathBuf>,

    /// Skip the user-level configuration file.
    pub no_global_config: bool,

    /// Disable colored tool output.
    pub no_color: bool,
}

impl GlobalOptions {
    /// Flags that override configuration leaves.
    pub fn overrides(&self) -> CliOverrides {
        let verbosity = if self.verbose {
            Some(Verbosity::Verbose)
        } else if self.quiet {
            Some(Verbosity::Quiet)
        } else {
            None
        };
        CliOverrides {
            verbosity,
            colors: self.no_color.then_some(false),
        }
    }

    /// Root detector carrying the injected overrides.
    pub fn detector(&self) -> RootDetector {
        RootDetector::new()
            .with_root_override(self.project_root.clone())
            .with_installed_vendor_dir(self.vendor_dir.clone())
    }

    /// Project root for the current directory.
    pub fn detect_root(&self) -> Result<PathBuf, CliError> {
        let start = env::current_dir()?;
        Ok(self.detector().detect_project_root(&start)?)
    }

    /// Configuration builder for the project at `root`.
    pub fn config_builder(&self, root: &std::path::Path) -> ConfigBuilder {
        let mut builder = ConfigBuilder::new()
            .with_project_root(root)
            .with_overrides(self.overrides());
        if let Some(config) = &self.config {
            builder = builder.with_config_file(config);
        }
        if self.no_global_config {
            builder = builder.skip_global();
        }
        builder
    }
}

/// Everything a command needs about the project, resolved once.
pub struct ProjectContext {
    /// Canonical project root.
    pub root: PathBuf,
    /// Vendor detection outcome.
    pub vendor: VendorDirectory,
    /// Merged, validated configuration.
    pub config: Configuration,
    explicit_path: Option<PathBuf>,
    scanner: PathScanner,
}

impl ProjectContext {
    /// Detect the project and load its configuration.
    ///
    /// The configured `output.verbosity` is applied to logging here unless a
    /// flag or `QT_LOG_MODE` already decided it.
    pub fn load(global: &GlobalOptions) -> Result<Self, CliError> {
        let detector = global.detector();
        let root = detector.detect_project_root(&env::current_dir()?)?;
        let vendor = detector.vendor_directory(&root);
        let config = global.config_builder(&root).build()?;
        apply_configured_level(global.verbose, global.quiet, config.verbosity());

        log::debug!("project root: {}", root.display());
        if let Some(path) = vendor.path() {
            log::debug!("vendor directory: {}", path.display());
        }

        Ok(Self {
            scanner: PathScanner::new(&root),
            root,
            vendor,
            config,
            explicit_path: global.path.clone(),
        })
    }

    /// Directories `tool` should run against.
    ///
    /// `--path` bypasses the scanner and must name an existing directory.
    pub fn resolve_paths(&mut self, tool: Tool) -> Result<ResolvedPathSet, CliError> {
        if let Some(path) = &self.explicit_path {
            let dir = canonicalize_dir(path)?;
            return Ok(ResolvedPathSet::new(vec![dir]));
        }
        let spec = self.config.tool_path_spec(tool);
        Ok(self.scanner.resolve(&spec, &self.vendor)?)
    }
}
