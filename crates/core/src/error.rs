//! Base error types for devhook
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        /// The file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A device specification could not be decoded
    #[error("Failed to parse device spec {}: {message}", path.display())]
    SpecParse {
        /// The device specification file
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Agent configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
