//! Error types for notesync core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] notesync_storage::StorageError),

    /// The collection could not be serialized.
    #[error("failed to encode notes: {0}")]
    Encode(#[source] serde_json::Error),

    /// The persisted collection is not a JSON array of notes.
    #[error("persisted notes are corrupt: {0}")]
    Decode(#[source] serde_json::Error),
}

impl CoreError {
    /// Returns true if persisted bytes were read but could not be decoded.
    pub fn is_corruption(&self) -> bool {
        matches!(self, CoreError::Decode(_))
    }
}
