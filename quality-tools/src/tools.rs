//! Turning a resolved configuration into tool command lines.
//!
//! Each tool is one row in [`COMMANDS`]: which binary to run, which
//! subcommand, which actions it supports, and a function that builds its
//! option flags from the [`Configuration`]. [`ToolCommand::plan`] combines a
//! row with a [`ResolvedPathSet`] into an [`InvocationPlan`], and a
//! [`Runner`] executes the plan.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{Configuration, Tool, Verbosity};
use crate::error::{Error, Result};
use crate::paths::ResolvedPathSet;
use crate::project::{VendorDirectory, MANIFEST_FILE};

/// What the user asked a tool to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Report problems without changing files.
    Lint,
    /// Apply fixes in place.
    Fix,
}

impl Action {
    /// The action as typed on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::Fix => "fix",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tool's executable is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binary {
    /// A script in the vendor `bin` directory.
    VendorBin(&'static str),
    /// A program on `PATH`.
    System(&'static str),
}

/// What a tool is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every resolved directory.
    Directories,
    /// One `composer.json`.
    ComposerManifest,
}

type FlagBuilder = fn(&Configuration, Action) -> Vec<String>;

/// One row of the tool table.
#[derive(Debug, Clone, Copy)]
pub struct ToolCommand {
    /// The tool this row describes.
    pub tool: Tool,
    /// Executable.
    pub binary: Binary,
    /// Subcommand placed before any flag.
    pub subcommand: Option<&'static str>,
    /// Actions the tool supports.
    pub actions: &'static [Action],
    /// What the positional arguments are.
    pub target: Target,
    flags: FlagBuilder,
}

/// The tool table.
pub const COMMANDS: [ToolCommand; 6] = [
    ToolCommand {
        tool: Tool::Rector,
        binary: Binary::VendorBin("rector"),
        subcommand: Some("process"),
        actions: &[Action::Lint, Action::Fix],
        target: Target::Directories,
        flags: rector_flags,
    },
    ToolCommand {
        tool: Tool::Fractor,
        binary: Binary::VendorBin("fractor"),
        subcommand: Some("process"),
        actions: &[Action::Lint, Action::Fix],
        target: Target::Directories,
        flags: fractor_flags,
    },
    ToolCommand {
        tool: Tool::Phpstan,
        binary: Binary::VendorBin("phpstan"),
        subcommand: Some("analyse"),
        actions: &[Action::Lint],
        target: Target::Directories,
        flags: phpstan_flags,
    },
    ToolCommand {
        tool: Tool::PhpCsFixer,
        binary: Binary::VendorBin("php-cs-fixer"),
        subcommand: Some("fix"),
        actions: &[Action::Lint, Action::Fix],
        target: Target::Directories,
        flags: php_cs_fixer_flags,
    },
    ToolCommand {
        tool: Tool::TypoScriptLint,
        binary: Binary::VendorBin("typoscript-lint"),
        subcommand: None,
        actions: &[Action::Lint],
        target: Target::Directories,
        flags: typoscript_lint_flags,
    },
    ToolCommand {
        tool: Tool::ComposerNormalize,
        binary: Binary::System("composer"),
        subcommand: Some("normalize"),
        actions: &[Action::Lint, Action::Fix],
        target: Target::ComposerManifest,
        flags: composer_normalize_flags,
    },
];

impl ToolCommand {
    /// The row for `tool`.
    #[must_use]
    pub fn for_tool(tool: Tool) -> &'static ToolCommand {
        // Rows are in `Tool::ALL` order.
        let index = Tool::ALL.iter().position(|t| *t == tool).unwrap_or_default();
        &COMMANDS[index]
    }

    /// Whether `action` is supported.
    #[must_use]
    pub fn supports(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Path of the executable.
    #[must_use]
    pub fn program(&self, project_root: &Path, vendor: &VendorDirectory) -> PathBuf {
        match self.binary {
            Binary::VendorBin(name) => vendor
                .path()
                .map_or_else(|| project_root.join("vendor"), Path::to_path_buf)
                .join("bin")
                .join(name),
            Binary::System(name) => PathBuf::from(name),
        }
    }

    /// Build the command line for `action` over `paths`.
    ///
    /// Returns `Ok(None)` when there is nothing to run the tool on. The
    /// caller decides whether that is a failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAction`] if the tool cannot perform
    /// `action`.
    pub fn plan(
        &self,
        action: Action,
        config: &Configuration,
        paths: &ResolvedPathSet,
        project_root: &Path,
        vendor: &VendorDirectory,
    ) -> Result<Option<InvocationPlan>> {
        if !self.supports(action) {
            return Err(Error::UnsupportedAction {
                tool: self.tool.to_string(),
                action: action.to_string(),
            });
        }

        let targets: Vec<PathBuf> = match self.target {
            Target::Directories => paths.iter().cloned().collect(),
            Target::ComposerManifest => manifest_target(paths, project_root).into_iter().collect(),
        };
        if targets.is_empty() {
            log::debug!("{}: nothing to scan", self.tool);
            return Ok(None);
        }

        let mut args: Vec<String> = self.subcommand.map(str::to_string).into_iter().collect();
        args.extend(console_flags(config));
        args.extend((self.flags)(config, action));
        args.extend(targets.iter().map(|p| p.to_string_lossy().into_owned()));

        Ok(Some(InvocationPlan {
            program: self.program(project_root, vendor),
            args,
            working_dir: project_root.to_path_buf(),
        }))
    }
}

/// First `composer.json` among the resolved directories, then the project root.
fn manifest_target(paths: &ResolvedPathSet, project_root: &Path) -> Option<PathBuf> {
    paths
        .iter()
        .map(PathBuf::as_path)
        .chain(std::iter::once(project_root))
        .map(|dir| dir.join(MANIFEST_FILE))
        .find(|manifest| manifest.is_file())
}

/// Verbosity and color flags understood by every tool in the table.
fn console_flags(config: &Configuration) -> Vec<String> {
    let mut flags = Vec::new();
    match config.verbosity() {
        Verbosity::Quiet => flags.push("--quiet".to_string()),
        Verbosity::Normal => {}
        Verbosity::Verbose => flags.push("-v".to_string()),
        Verbosity::Debug => flags.push("-vvv".to_string()),
    }
    if !config.colors() {
        flags.push("--no-ansi".to_string());
    }
    flags
}

fn config_flag(flag: &str, config: &Configuration, tool: Tool) -> Vec<String> {
    config
        .tool_config_file(tool)
        .map(|file| vec![flag.to_string(), file.to_string()])
        .unwrap_or_default()
}

fn rector_flags(config: &Configuration, action: Action) -> Vec<String> {
    let mut flags = config_flag("--config", config, Tool::Rector);
    if action == Action::Lint {
        flags.push("--dry-run".to_string());
    }
    if !config.progress() {
        flags.push("--no-progress-bar".to_string());
    }
    if !config.cache_enabled() {
        flags.push("--clear-cache".to_string());
    }
    flags
}

fn fractor_flags(config: &Configuration, action: Action) -> Vec<String> {
    let mut flags = config_flag("--config", config, Tool::Fractor);
    if action == Action::Lint {
        flags.push("--dry-run".to_string());
    }
    flags
}

fn phpstan_flags(config: &Configuration, _action: Action) -> Vec<String> {
    let mut flags = config_flag("--configuration", config, Tool::Phpstan);
    flags.push(format!("--level={}", config.phpstan_level()));
    flags.push(format!("--memory-limit={}", config.phpstan_memory_limit()));
    if !config.progress() {
        flags.push("--no-progress".to_string());
    }
    flags
}

fn php_cs_fixer_flags(config: &Configuration, action: Action) -> Vec<String> {
    let mut flags = config_flag("--config", config, Tool::PhpCsFixer);
    if action == Action::Lint {
        flags.push("--dry-run".to_string());
        flags.push("--diff".to_string());
    }
    if let Some(cache) = config.php_cs_fixer_cache_file() {
        flags.push(format!("--cache-file={cache}"));
    }
    if !config.cache_enabled() {
        flags.push("--using-cache=no".to_string());
    }
    if !config.progress() {
        flags.push("--show-progress=none".to_string());
    }
    flags
}

fn typoscript_lint_flags(config: &Configuration, _action: Action) -> Vec<String> {
    let mut flags = config_flag("--config", config, Tool::TypoScriptLint);
    if !config.tolerate_warnings() {
        flags.push("--fail-on-warnings".to_string());
    }
    flags
}

fn composer_normalize_flags(config: &Configuration, action: Action) -> Vec<String> {
    let mut flags = Vec::new();
    if action == Action::Lint {
        flags.push("--dry-run".to_string());
    }
    flags.push(format!("--indent-size={}", config.composer_indent_size()));
    flags.push(format!(
        "--indent-style={}",
        config.composer_indent_style().as_str()
    ));
    flags
}

/// A fully built command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationPlan {
    /// Executable.
    pub program: PathBuf,
    /// Arguments, subcommand first.
    pub args: Vec<String>,
    /// Directory the tool runs in.
    pub working_dir: PathBuf,
}

impl InvocationPlan {
    /// The command line as a shell would read it.
    ///
    /// # Examples
    ///
    /// ```
    /// use quality_tools::tools::InvocationPlan;
    /// use std::path::PathBuf;
    ///
    /// let plan = InvocationPlan {
    ///     program: PathBuf::from("vendor/bin/phpstan"),
    ///     args: vec!["analyse".into(), "my dir".into()],
    ///     working_dir: PathBuf::from("/app"),
    /// };
    /// assert_eq!(plan.command_line(), "vendor/bin/phpstan analyse 'my dir'");
    /// ```
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .map(|word| shell_quote(&word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for InvocationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Executes invocation plans.
#[cfg_attr(test, mockall::automock)]
pub trait Runner {
    /// Run `plan` to completion and return the tool's exit code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Process`] if the program cannot be started.
    fn run(&self, plan: &InvocationPlan) -> Result<i32>;
}

/// Runs plans as child processes sharing this process's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, plan: &InvocationPlan) -> Result<i32> {
        log::debug!("running {plan} in {}", plan.working_dir.display());
        let status = Command::new(&plan.program)
            .args(&plan.args)
            .current_dir(&plan.working_dir)
            .status()
            .map_err(|source| Error::Process {
                program: plan.program.to_string_lossy().into_owned(),
                source,
            })?;

        // Killed by a signal: report a generic failure.
        Ok(status.code().unwrap_or(1))
    }
}

/// What happened to a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    /// The command line, printed instead of run.
    DryRun(String),
    /// The tool ran and exited with this code.
    Exited(i32),
}

/// Run `plan` with `runner`, or only render it when `dry_run` is set.
///
/// # Errors
///
/// Propagates the runner's error.
pub fn execute(plan: &InvocationPlan, runner: &dyn Runner, dry_run: bool) -> Result<Execution> {
    if dry_run {
        return Ok(Execution::DryRun(plan.command_line()));
    }
    runner.run(plan).map(Execution::Exited)
}
