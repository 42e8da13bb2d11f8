//! Lifecycle hook system
//!
//! Watches the filesystem mutations of one configuration-apply cycle and runs
//! declared actions (typically service reloads) at four checkpoints: before
//! and after an update is applied, before and after a reboot.
//!
//! ## Execution Model
//!
//! - `sync` refreshes the configured hooks and starts a new mutation cycle
//! - The file writer reports created/updated/removed paths while it works
//! - A checkpoint evaluates each action's condition in order and runs the
//!   matching ones, stopping at the first failure
//! - Built-in actions always run before configured ones
//!
//! ## Module Organization
//!
//! - `ledger`: Per-cycle record of created, updated and removed paths
//! - `vars`: Command-line variables and the per-checkpoint action context
//! - `condition`: Condition evaluation against the ledger
//! - `command`: Placeholder substitution and command-line splitting
//! - `action`: Timeout/env/work-dir resolution and command execution
//! - `defaults`: Built-in actions shipped with the agent
//! - `manager`: Orchestration and per-checkpoint error tracking

pub mod action;
pub mod command;
pub mod condition;
pub mod defaults;
pub mod ledger;
pub mod manager;
pub mod vars;

// Re-export main types for convenience
pub use action::{ActionExecutor, DEFAULT_ACTION_TIMEOUT, parse_duration};
pub use defaults::default_actions;
pub use ledger::{FileSnapshot, MutationLedger};
pub use manager::{HookManager, HookManagerBuilder};
pub use vars::{ActionContext, CommandLineVar, CommandLineVars};
