//! Test fixtures.

use notesync_core::{Collection, Note, NoteSync};
use notesync_storage::{FileBackend, InMemoryBackend, StorageBackend, StorageError, StorageResult};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tempfile::TempDir;

/// A [`NoteSync`] over a [`FileBackend`] in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TempStore {
    dir: TempDir,
    sync: NoteSync<FileBackend>,
}

impl TempStore {
    /// Creates a fixture with an empty data file path.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the backend cannot be created.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let backend = FileBackend::open(&dir.path().join("notes.json"))
            .expect("failed to open file backend");
        Self {
            dir,
            sync: NoteSync::new(backend),
        }
    }

    /// Returns the sync service.
    pub fn sync(&self) -> &NoteSync<FileBackend> {
        &self.sync
    }

    /// Returns the path of the data file.
    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("notes.json")
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-memory backend whose writes can be made to fail.
///
/// Reads always succeed. While failing is enabled every `replace_all`
/// returns an I/O error and leaves the blob untouched.
#[derive(Debug, Default)]
pub struct FailingBackend {
    inner: InMemoryBackend,
    fail_writes: AtomicBool,
    attempted_writes: AtomicUsize,
}

impl FailingBackend {
    /// Creates a backend that fails every write.
    #[must_use]
    pub fn failing() -> Self {
        let backend = Self::default();
        backend.set_failing(true);
        backend
    }

    /// Creates a backend holding `data` that fails every write.
    #[must_use]
    pub fn failing_with_data(data: Vec<u8>) -> Self {
        Self {
            inner: InMemoryBackend::with_data(data),
            fail_writes: AtomicBool::new(true),
            attempted_writes: AtomicUsize::new(0),
        }
    }

    /// Enables or disables write failures.
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    /// Returns how many writes were attempted.
    pub fn attempted_writes(&self) -> usize {
        self.attempted_writes.load(Ordering::SeqCst)
    }

    /// Returns the current blob.
    pub fn data(&self) -> Option<Vec<u8>> {
        self.inner.data()
    }
}

impl StorageBackend for FailingBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        self.inner.read_all()
    }

    fn replace_all(&self, data: &[u8]) -> StorageResult<()> {
        self.attempted_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("simulated write failure")));
        }
        self.inner.replace_all(data)
    }

    fn size(&self) -> StorageResult<u64> {
        self.inner.size()
    }
}

/// The three notes used throughout the tests.
pub fn sample_collection() -> Collection {
    Collection::from(vec![
        Note::new(1, 5).with_field("text", "a"),
        Note::new(2, 7).with_field("text", "b"),
        Note::new("c3", "2024-01-01T00:00:00Z").with_field("text", "c"),
    ])
}

/// Serializes a collection into the bytes the store would persist.
///
/// # Panics
///
/// Panics if the collection cannot be serialized.
pub fn encode(collection: &Collection) -> Vec<u8> {
    serde_json::to_vec_pretty(collection).expect("collection serializes")
}
