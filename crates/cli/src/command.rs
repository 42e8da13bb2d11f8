//! Command trait for devhook CLI
//!
//! This module defines the `Command` trait that all devhook commands implement,
//! giving every subcommand the same entry point.

use crate::error::Result;
use devhook_config::Config;

/// Trait for all devhook commands
///
/// The `execute` method receives the loaded agent configuration.
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::error::Result;
/// use clap::Args;
/// use devhook_config::Config;
///
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(short, long)]
///     pub some_flag: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, config: &Config) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given configuration
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command fails to execute. Error messages should
    /// be descriptive enough for the operator to understand what went wrong.
    fn execute(&self, config: &Config) -> Result<Self::Output>;
}
