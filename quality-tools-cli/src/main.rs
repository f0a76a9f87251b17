//! Main entry point for the `qt` CLI.
//!
//! This is the command-line interface for running PHP quality tools with a
//! shared configuration:
//! - `lint` / `fix`: Run one tool over the configured paths
//! - `config validate` / `config show`: Inspect the configuration
//! - `paths`: Print the directories a tool would run against
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use quality_tools::tools::Action;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _level = quality_tools::init_logger(cli.verbose, cli.quiet);

    let global = cli.global_options();

    // Execute the command
    let result = match cli.command {
        cli::Command::Lint(cmd) => cmd.execute(Action::Lint, &global),
        cli::Command::Fix(cmd) => cmd.execute(Action::Fix, &global),
        cli::Command::Config(cmd) => cmd.execute(&global),
        cli::Command::Paths(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
