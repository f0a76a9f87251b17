//! `qt config validate` and `qt config show`.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, Subcommand, ValueEnum};
use quality_tools::config::{ConfigLoader, ConfigMerger, ConfigValidator, ProcessEnv};
use quality_tools::Error as LibError;
use std::path::PathBuf;

/// Inspect the configuration.
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Validate one file, or the merged configuration
    Validate(ValidateCommand),

    /// Print the merged configuration
    Show(ShowCommand),
}

impl ConfigCommand {
    /// Execute the selected subcommand.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self.command {
            ConfigSubcommand::Validate(cmd) => cmd.execute(global),
            ConfigSubcommand::Show(cmd) => cmd.execute(global),
        }
    }
}

/// Validate a configuration file or the merged configuration.
#[derive(Args)]
pub struct ValidateCommand {
    /// File to validate on its own; defaults to the merged configuration
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let sources = match &self.file {
            Some(file) => vec![ConfigLoader::load_explicit(file, &ProcessEnv)?],
            None => {
                let root = global.detect_root()?;
                global.config_builder(&root).sources()?
            }
        };
        let described: Vec<String> = sources.iter().map(|s| s.describe()).collect();

        let merged = ConfigMerger::merge(&sources);
        let report = ConfigValidator::validate_sources(&sources, &merged);
        if !report.is_valid() {
            return Err(LibError::Validation(report).into());
        }

        if !global.quiet {
            println!("Configuration is valid");
            if global.verbose {
                for source in described {
                    println!("  {source}");
                }
            }
        }
        Ok(())
    }
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    /// YAML, as written in configuration files
    #[default]
    Yaml,
    /// JSON
    Json,
}

/// Print the merged configuration.
#[derive(Args)]
pub struct ShowCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = ShowFormat::Yaml)]
    pub format: ShowFormat,
}

impl ShowCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let root = global.detect_root()?;
        let config = global.config_builder(&root).build()?;

        let rendered = match self.format {
            ShowFormat::Yaml => config.to_yaml()?,
            ShowFormat::Json => serde_json::to_string_pretty(config.tree()).map_err(|e| {
                LibError::Configuration {
                    file: None,
                    key: None,
                    message: format!("cannot render as JSON: {e}"),
                }
            })?,
        };
        println!("{}", rendered.trim_end());
        Ok(())
    }
}
