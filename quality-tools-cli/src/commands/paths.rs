//! `qt paths <tool>`.

use crate::error::CliError;
use crate::utils::{GlobalOptions, ProjectContext};
use clap::Args;
use quality_tools::Tool;

/// Print the directories a tool would run against.
#[derive(Args)]
pub struct PathsCommand {
    /// Tool whose paths to resolve
    #[arg(value_enum)]
    pub tool: Tool,

    /// Print only the first path
    #[arg(long)]
    pub first: bool,
}

impl PathsCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut context = ProjectContext::load(global)?;
        let paths = context.resolve_paths(self.tool)?;

        if paths.is_empty() {
            return Err(CliError::NothingToScan { tool: self.tool });
        }

        if self.first {
            if let Some(first) = paths.first() {
                println!("{}", first.display());
            }
        } else {
            for path in &paths {
                println!("{}", path.display());
            }
        }
        Ok(())
    }
}
