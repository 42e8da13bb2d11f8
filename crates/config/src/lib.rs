//! Configuration management for devhook
//!
//! This crate handles:
//! - The rendered device specification (hook declarations per checkpoint)
//! - Loading device specifications from TOML or JSON files
//! - Agent configuration loading
//! - Logging initialization

pub mod config;
pub mod logging;
pub mod spec;

// Re-export error types from core
pub use devhook_core::{Error, Result};

// Re-export main types
pub use config::{Config, GeneralConfig, HooksConfig};
pub use spec::{
    Checkpoint, DeviceHooksSpec, FileOperation, HookAction, HookActionRun, HookCondition,
    HookConditionFileOp, RenderedDeviceSpec, load_spec,
};
