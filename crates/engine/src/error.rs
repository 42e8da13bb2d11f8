//! Error types for devhook-engine
//!
//! Hook errors are latched per checkpoint and handed out as snapshots to
//! status reporters, so every variant is cheap to clone.

use devhook_config::Checkpoint;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for hook engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the hook engine
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// An action declares a timeout that is not a valid duration
    #[error("invalid timeout '{value}': {reason}")]
    InvalidTimeout {
        /// The declared timeout
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// An action declares a malformed environment variable
    #[error("invalid envVar format: {reason}: {entry}")]
    InvalidEnvVar {
        /// The violated rule
        reason: &'static str,
        /// The offending `KEY=value` entry
        entry: String,
    },

    /// The declared working directory does not exist
    #[error("workdir {}: file does not exist", path.display())]
    WorkDirNotFound {
        /// The declared working directory
        path: PathBuf,
    },

    /// The declared working directory could not be inspected
    #[error("failed to check if directory {} exists: {source}", path.display())]
    WorkDirCheck {
        /// The declared working directory
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The command ran (or failed to run) and exited non-zero
    #[error("{stderr} (exit code {exit_code})")]
    CommandFailed {
        /// The rendered command line
        command: String,
        /// Captured standard error
        stderr: String,
        /// Process exit code
        exit_code: i32,
    },

    /// An action of a checkpoint failed; `index` is 1-based
    #[error("failed to execute {checkpoint} hook action #{index}: {source}")]
    Action {
        /// Checkpoint the action belongs to
        checkpoint: Checkpoint,
        /// Position in the merged action list, starting at 1
        index: usize,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the checkpoint and 1-based action index to an action error
    #[must_use]
    pub fn in_action(self, checkpoint: Checkpoint, index: usize) -> Self {
        Error::Action {
            checkpoint,
            index,
            source: Box::new(self),
        }
    }

    /// Check whether this error stems from hook configuration rather than execution
    pub fn is_config_error(&self) -> bool {
        match self {
            Error::InvalidTimeout { .. } | Error::InvalidEnvVar { .. } => true,
            Error::Action { source, .. } => source.is_config_error(),
            _ => false,
        }
    }
}
