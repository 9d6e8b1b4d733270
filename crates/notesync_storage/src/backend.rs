//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-blob storage backend.
///
/// A backend stores one opaque byte blob. Callers read it in full and
/// replace it in full; there is no append, seek or partial update.
///
/// # Invariants
///
/// - `read_all` returns `None` until the first successful `replace_all`
/// - After `replace_all(data)` returns `Ok`, `read_all` returns exactly `data`
/// - `replace_all` is atomic with respect to concurrent `read_all` calls:
///   a reader observes the complete old blob or the complete new blob
/// - A failed `replace_all` leaves the previous blob untouched
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the persisted blob.
    ///
    /// Returns `Ok(None)` if nothing has ever been persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium exists but cannot be read.
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Atomically replaces the persisted blob with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new blob could not be made durable. The
    /// previous blob is still in place in that case.
    fn replace_all(&self, data: &[u8]) -> StorageResult<()>;

    /// Returns the size in bytes of the persisted blob, or 0 if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<B> {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        (**self).read_all()
    }

    fn replace_all(&self, data: &[u8]) -> StorageResult<()> {
        (**self).replace_all(data)
    }

    fn size(&self) -> StorageResult<u64> {
        (**self).size()
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        (**self).read_all()
    }

    fn replace_all(&self, data: &[u8]) -> StorageResult<()> {
        (**self).replace_all(data)
    }

    fn size(&self) -> StorageResult<u64> {
        (**self).size()
    }
}
