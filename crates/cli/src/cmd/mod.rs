//! CLI command implementations
//!
//! This module contains all command implementations for the devhook CLI.

pub mod check;
pub mod defaults;
pub mod run;
