//! Core types and utilities for devhook
//!
//! This is the foundation crate that all other devhook crates depend on.
//! It provides:
//! - Base error types
//! - The bounded execution context threaded through command execution
//! - The command executor interface consumed by the hook engine
//!
//! This crate has no dependencies on other devhook crates.

pub mod context;
pub mod error;
pub mod traits;

pub use context::{DoneReason, ExecContext};
pub use error::{Error, Result};
pub use traits::{ExecOutput, Executer};
