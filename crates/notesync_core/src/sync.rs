//! Serialized merge of client submissions into the store.

use crate::collection::Collection;
use crate::error::CoreResult;
use crate::reconcile::{reconcile, MergeStats, Reconciliation};
use crate::store::{NoteStore, Snapshot};
use notesync_storage::StorageBackend;
use parking_lot::Mutex;
use tracing::{debug, info};

/// Result of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Number of notes in the stored collection after the merge.
    pub merged_count: usize,
    /// Per-note merge counters.
    pub stats: MergeStats,
}

/// The note synchronization service.
///
/// `NoteSync` owns the [`NoteStore`] and runs every submission as one
/// load → reconcile → replace unit under a merge lock, so concurrent
/// submissions apply in some serial order and none is lost to a stale read.
///
/// Reads do not take the merge lock; the backend's atomic replace
/// guarantees they see a complete collection.
///
/// # Example
///
/// ```rust
/// use notesync_core::{Collection, Note, NoteSync};
/// use notesync_storage::InMemoryBackend;
///
/// let sync = NoteSync::new(InMemoryBackend::new());
/// let outcome = sync
///     .submit_notes(Collection::from(vec![Note::new(1, 5)]))
///     .unwrap();
/// assert_eq!(outcome.merged_count, 1);
/// assert_eq!(sync.get_notes().len(), 1);
/// ```
#[derive(Debug)]
pub struct NoteSync<B> {
    store: NoteStore<B>,
    merge_lock: Mutex<()>,
}

impl<B: StorageBackend> NoteSync<B> {
    /// Creates a service over the given backend.
    pub fn new(backend: B) -> Self {
        Self::with_store(NoteStore::new(backend))
    }

    /// Creates a service over an existing store.
    pub fn with_store(store: NoteStore<B>) -> Self {
        Self {
            store,
            merge_lock: Mutex::new(()),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &NoteStore<B> {
        &self.store
    }

    /// Returns the full stored collection.
    pub fn get_notes(&self) -> Collection {
        let notes = self.store.load_all();
        debug!(count = notes.len(), "serving notes");
        notes
    }

    /// Merges `incoming` into the stored collection and persists the result.
    ///
    /// Stored records that are not notes take no part in the merge and are
    /// written back unchanged. `merged_count` counts notes only.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged collection cannot be persisted. The
    /// merge result is discarded and the store keeps its previous content.
    pub fn submit_notes(&self, incoming: Collection) -> CoreResult<SubmitOutcome> {
        let received = incoming.len();
        let _guard = self.merge_lock.lock();

        let Snapshot {
            notes: current,
            unrecognized,
        } = self.store.load_snapshot();
        let Reconciliation { notes, stats } = reconcile(current, incoming);
        self.store.replace_keeping(&notes, &unrecognized)?;

        info!(
            received,
            merged = notes.len(),
            unrecognized = unrecognized.len(),
            inserted = stats.inserted,
            updated = stats.updated,
            kept = stats.kept,
            "merged notes"
        );

        Ok(SubmitOutcome {
            merged_count: notes.len(),
            stats,
        })
    }
}
