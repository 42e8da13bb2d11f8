//! Error types for CLI commands
//!
//! This module defines structured error types using thiserror, so commands
//! can tell configuration problems apart from hook failures.

use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A specification or configuration file could not be loaded
    #[error(transparent)]
    Core(#[from] devhook_core::Error),

    /// A checkpoint ran and one of its actions failed
    #[error(transparent)]
    HookFailed(#[from] devhook_engine::Error),

    /// Static validation found invalid hook actions
    #[error("Invalid hooks: {count} action(s) failed validation")]
    InvalidHooks {
        /// Number of invalid actions
        count: usize,
    },
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// Create a `ConfigError` from any error type
    pub fn config<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::ConfigError(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devhook_config::Checkpoint;

    #[test]
    fn test_config_error() {
        let err = devhook_engine::hooks::parse_duration("soon").unwrap_err();
        let error = CommandError::config(err);
        assert!(error.to_string().starts_with("Configuration error: invalid timeout 'soon'"));
    }

    #[test]
    fn test_hook_failed_is_transparent() {
        let err = devhook_engine::Error::CommandFailed {
            command: "false".to_string(),
            stderr: "boom".to_string(),
            exit_code: 1,
        }
        .in_action(Checkpoint::AfterRebooting, 1);

        let error = CommandError::from(err);
        assert_eq!(
            error.to_string(),
            "failed to execute afterRebooting hook action #1: boom (exit code 1)"
        );
    }

    #[test]
    fn test_invalid_hooks() {
        let error = CommandError::InvalidHooks { count: 2 };
        assert!(error.to_string().contains("2 action(s)"));
    }
}
