//! JSON persistence of the note collection.

use crate::collection::Collection;
use crate::error::{CoreError, CoreResult};
use crate::note::Note;
use notesync_storage::StorageBackend;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Everything read back from the backend.
///
/// Records that do not parse as a [`Note`] are kept verbatim in
/// `unrecognized` so a rewrite does not drop them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Records that parsed as notes, in stored order.
    pub notes: Collection,
    /// Records that did not, in stored order.
    pub unrecognized: Vec<Value>,
}

/// Notes followed by unrecognized records, as one JSON array.
struct Records<'a> {
    notes: &'a Collection,
    unrecognized: &'a [Value],
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.notes.len() + self.unrecognized.len()))?;
        for note in self.notes {
            seq.serialize_element(note)?;
        }
        for record in self.unrecognized {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

/// Durable holder of the single authoritative collection.
///
/// The collection is stored as one pretty-printed JSON array in a
/// [`StorageBackend`]. Reads and writes always cover the whole collection.
///
/// # Example
///
/// ```rust
/// use notesync_core::{Collection, Note, NoteStore};
/// use notesync_storage::InMemoryBackend;
///
/// let store = NoteStore::new(InMemoryBackend::new());
/// assert!(store.load_all().is_empty());
///
/// store.replace_all(&Collection::from(vec![Note::new(1, 5)])).unwrap();
/// assert_eq!(store.load_all().len(), 1);
/// ```
#[derive(Debug)]
pub struct NoteStore<B> {
    backend: B,
}

impl<B: StorageBackend> NoteStore<B> {
    /// Creates a store over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads every persisted record, surfacing read and decode errors.
    ///
    /// Records are decoded one by one; a record that is not a note is
    /// logged and returned in [`Snapshot::unrecognized`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the backend cannot be read and
    /// [`CoreError::Decode`] if the bytes are not a JSON array.
    pub fn try_load_snapshot(&self) -> CoreResult<Snapshot> {
        let Some(bytes) = self.backend.read_all()? else {
            debug!("no persisted notes yet");
            return Ok(Snapshot::default());
        };

        let records: Vec<Value> = serde_json::from_slice(&bytes).map_err(CoreError::Decode)?;
        let mut notes = Vec::with_capacity(records.len());
        let mut unrecognized = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match Note::deserialize(&record) {
                Ok(note) => notes.push(note),
                Err(e) => {
                    warn!(index, error = %e, "keeping stored record that is not a note");
                    unrecognized.push(record);
                }
            }
        }

        debug!(count = notes.len(), unrecognized = unrecognized.len(), "loaded notes");
        Ok(Snapshot {
            notes: Collection::from(notes),
            unrecognized,
        })
    }

    /// Loads the persisted notes, surfacing read and decode errors.
    ///
    /// A backend that has never been written yields an empty collection.
    /// Records that are not notes are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`NoteStore::try_load_snapshot`].
    pub fn try_load_all(&self) -> CoreResult<Collection> {
        self.try_load_snapshot().map(|snapshot| snapshot.notes)
    }

    /// Loads every persisted record.
    ///
    /// Unreadable data, or data that is not a JSON array, is logged and
    /// replaced by an empty snapshot; this never fails.
    pub fn load_snapshot(&self) -> Snapshot {
        match self.try_load_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "failed to load notes, continuing with an empty collection");
                Snapshot::default()
            }
        }
    }

    /// Loads the persisted notes. Never fails; see [`NoteStore::load_snapshot`].
    pub fn load_all(&self) -> Collection {
        self.load_snapshot().notes
    }

    /// Overwrites the persisted collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be encoded or written. The
    /// previously persisted collection is unchanged in that case.
    pub fn replace_all(&self, notes: &Collection) -> CoreResult<()> {
        self.replace_keeping(notes, &[])
    }

    /// Overwrites the persisted collection, writing `unrecognized` records
    /// back after the notes.
    ///
    /// # Errors
    ///
    /// Same as [`NoteStore::replace_all`].
    pub fn replace_keeping(&self, notes: &Collection, unrecognized: &[Value]) -> CoreResult<()> {
        let records = Records {
            notes,
            unrecognized,
        };
        let bytes = serde_json::to_vec_pretty(&records).map_err(CoreError::Encode)?;
        self.backend.replace_all(&bytes)?;
        info!(
            count = notes.len(),
            unrecognized = unrecognized.len(),
            bytes = bytes.len(),
            "saved notes"
        );
        Ok(())
    }
}
