//! Build script for quality-tools-cli.
//!
//! This script generates a man page at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_name("PATH")
        .global(true)
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .global(true)
        .action(ArgAction::SetTrue)
}

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("qt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run PHP quality tools with one shared configuration")
        .long_about(
            "Uniform front end for rector, fractor, phpstan, php-cs-fixer, typoscript-lint \
             and composer-normalize, driven by one layered configuration",
        )
        .arg(flag("verbose", "Enable verbose output"))
        .arg(flag("quiet", "Suppress non-essential output"))
        .arg(
            path_arg("config", "Configuration file to use instead of the project file")
                .env("QT_CONFIG"),
        )
        .arg(path_arg(
            "path",
            "Run against this directory instead of the configured paths",
        ))
        .arg(path_arg("project-root", "Project root (skips detection)").env("QT_PROJECT_ROOT"))
        .arg(path_arg("vendor-dir", "Vendor directory reported by Composer").env("COMPOSER_VENDOR_DIR"))
        .arg(flag("no-global-config", "Ignore the user configuration file"))
        .arg(flag("no-color", "Disable colored tool output"))
        .subcommands(vec![
            Command::new("lint")
                .about("Check code with a tool without changing files")
                .long_about("Resolve the configured paths and run the tool in check mode"),
            Command::new("fix")
                .about("Let a tool fix code in place")
                .long_about("Resolve the configured paths and run the tool in fix mode"),
            Command::new("config")
                .about("Validate or print the configuration")
                .subcommands(vec![
                    Command::new("validate")
                        .about("Validate one file, or the merged configuration"),
                    Command::new("show").about("Print the merged configuration"),
                ]),
            Command::new("paths")
                .about("Print the directories a tool would run against")
                .long_about("Resolve and print the scan paths for one tool, one per line"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("qt.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
