//! Devhook CLI library
//!
//! This library contains the CLI logic for devhook, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devhook_config::Config;
use std::path::PathBuf;

use command::Command;

/// Devhook - lifecycle hooks for device configuration updates
#[derive(Parser, Debug)]
#[command(name = "devhook")]
#[command(about = "Run device lifecycle hooks around configuration updates and reboots")]
#[command(version)]
#[command(long_about = "Run device lifecycle hooks around configuration updates and reboots

Hooks are declared in a rendered device specification and run at four
checkpoints: beforeUpdating, afterUpdating, beforeRebooting and
afterRebooting. File operation conditions select actions based on the
files created, updated or removed during the update.")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, env = "DEVHOOK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "DEVHOOK_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for devhook CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one checkpoint of an apply cycle
    #[command(long_about = "Run one checkpoint of an apply cycle

Loads the desired specification (and optionally the current one), records
the given file mutations and runs every hook action of the checkpoint whose
condition matches.

Examples:
  • devhook run afterUpdating --spec desired.json --created /etc/app/a.conf
      → Run afterUpdating hooks for one created file

  • devhook run before-rebooting --spec desired.toml
      → Run beforeRebooting hooks")]
    Run(cmd::run::RunCommand),

    /// Validate the hooks of a specification without running them
    Check(cmd::check::CheckCommand),

    /// List the built-in hook actions
    Defaults(cmd::defaults::DefaultsCommand),
}

/// Main entry point for the CLI logic
pub fn run(cli: Cli) -> Result<()> {
    let config =
        Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    let verbose = cli.verbose || config.general.verbose;
    let log_file = cli.log_file.as_deref().or(config.general.log_file.as_deref());
    devhook_config::logging::init(verbose, log_file).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Run(run_cmd) => run_cmd.execute(&config)?,
        Commands::Check(check_cmd) => check_cmd.execute(&config)?,
        Commands::Defaults(defaults_cmd) => defaults_cmd.execute(&config)?,
    }

    Ok(())
}
