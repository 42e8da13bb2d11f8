//! # Devhook Engine
//!
//! Lifecycle hook engine for the device agent.
//!
//! While the agent applies a new configuration it tells the engine which
//! files it created, updated or removed. At four checkpoints (before and after
//! the update, before and after a reboot) the engine runs the declared
//! actions whose conditions match those mutations.
//!
//! - **Hooks**: Ledger, condition evaluation, command rendering and the
//!   [`HookManager`] orchestrating them
//! - **Execution**: [`CommandExecutor`], the process-backed executor

pub mod error;
pub mod exec;
pub mod hooks;

// Re-export error types
pub use error::{Error, Result};

// Re-export commonly used types
pub use exec::CommandExecutor;
pub use hooks::{FileSnapshot, HookManager, HookManagerBuilder, MutationLedger};
