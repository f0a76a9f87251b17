//! CLI command implementations.
//!
//! - `run`: `lint` and `fix` for one tool
//! - `config`: `config validate` and `config show`
//! - `paths`: print the resolved paths for one tool
//! - `completions`: shell completion scripts

pub mod completions;
pub mod config;
pub mod paths;
pub mod run;

pub use completions::CompletionsCommand;
pub use config::ConfigCommand;
pub use paths::PathsCommand;
pub use run::RunCommand;
