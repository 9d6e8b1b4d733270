//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// This backend keeps the blob in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral servers that don't need persistence
///
/// # Thread Safety
///
/// The blob sits behind a `RwLock`; a replace swaps the whole buffer
/// under the write lock, so readers never see a partial blob.
///
/// # Example
///
/// ```rust
/// use notesync_storage::{StorageBackend, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.replace_all(b"test data").unwrap();
/// assert_eq!(backend.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with a pre-existing blob.
    ///
    /// Useful for testing recovery from corrupt data.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }

    /// Returns a copy of the current blob.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }

    /// Drops the blob, returning the backend to the never-written state.
    pub fn clear(&self) {
        *self.data.write() = None;
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn replace_all(&self, data: &[u8]) -> StorageResult<()> {
        let blob = data.to_vec();
        *self.data.write() = Some(blob);
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().as_ref().map_or(0, |d| d.len() as u64))
    }
}
