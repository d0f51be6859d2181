//! Error types for filesync

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for filesync operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory listing error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("Not a directory: {}", .path.display())]
    InvalidPath { path: PathBuf },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error("No version index left for {stem}{extension}")]
    VersionOverflow { stem: String, extension: String },
}

impl Error {
    /// Whether this error came from a bad scan target supplied by the user.
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Error::InvalidPath { .. })
    }
}

/// Result type alias for filesync operations
pub type Result<T> = std::result::Result<T, Error>;
