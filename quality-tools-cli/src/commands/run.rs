//! `qt lint <tool>` and `qt fix <tool>`.

use crate::error::CliError;
use crate::utils::{GlobalOptions, ProjectContext};
use clap::Args;
use quality_tools::tools::{execute, Action, Execution, ProcessRunner, Runner, ToolCommand};
use quality_tools::Tool;

/// Run one tool over the configured paths.
#[derive(Args)]
pub struct RunCommand {
    /// Tool to run
    #[arg(value_enum)]
    pub tool: Tool,

    /// Print the command line instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

impl RunCommand {
    /// Execute the command.
    pub fn execute(self, action: Action, global: &GlobalOptions) -> Result<(), CliError> {
        let mut context = ProjectContext::load(global)?;
        self.run(action, global, &mut context, &ProcessRunner)
    }

    fn run(
        &self,
        action: Action,
        global: &GlobalOptions,
        context: &mut ProjectContext,
        runner: &dyn Runner,
    ) -> Result<(), CliError> {
        if !context.config.is_tool_enabled(self.tool) {
            if !global.quiet {
                eprintln!("{} is disabled in the configuration; skipping", self.tool);
            }
            return Ok(());
        }

        let paths = context.resolve_paths(self.tool)?;
        let plan = ToolCommand::for_tool(self.tool).plan(
            action,
            &context.config,
            &paths,
            &context.root,
            &context.vendor,
        )?;
        let Some(plan) = plan else {
            return Err(CliError::NothingToScan { tool: self.tool });
        };

        log::info!("{} {action}: {} path(s)", self.tool, paths.len());
        match execute(&plan, runner, self.dry_run)? {
            Execution::DryRun(line) => {
                println!("{line}");
                Ok(())
            }
            Execution::Exited(0) => Ok(()),
            Execution::Exited(code) => Err(CliError::ToolFailed {
                tool: self.tool,
                code,
            }),
        }
    }
}
