//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Another process holds the data file.
    #[error("data file is locked by another process: {}", path.display())]
    Locked {
        /// The data file that could not be locked.
        path: PathBuf,
    },
}

impl StorageError {
    /// Returns true if the error came from the operating system.
    pub fn is_io(&self) -> bool {
        matches!(self, StorageError::Io(_))
    }
}
