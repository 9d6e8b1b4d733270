//! Last-writer-wins reconciliation of two note collections.

use crate::collection::Collection;
use crate::note::{Note, NoteId};
use std::collections::HashMap;

/// Outcome of comparing an incoming note against the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No stored note has this id; the incoming note is admitted.
    Insert,
    /// The incoming note is strictly newer and replaces the stored one.
    AcceptIncoming,
    /// The stored note is newer or equally recent and stays.
    KeepStored,
}

/// Decides what happens to `incoming` given the stored note with its id.
///
/// Ties keep the stored note.
pub fn resolve(stored: Option<&Note>, incoming: &Note) -> Resolution {
    match stored {
        None => Resolution::Insert,
        Some(stored) if incoming.updated_at.is_newer_than(&stored.updated_at) => {
            Resolution::AcceptIncoming
        }
        Some(_) => Resolution::KeepStored,
    }
}

/// Counters describing a reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Incoming notes whose id was not stored.
    pub inserted: usize,
    /// Incoming notes that replaced an older stored note.
    pub updated: usize,
    /// Incoming notes discarded in favour of the stored note.
    pub kept: usize,
    /// Stored notes dropped because a later stored note had the same id.
    pub collapsed: usize,
}

impl MergeStats {
    /// Returns true if the merge changed the stored collection.
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.updated > 0 || self.collapsed > 0
    }
}

/// Result of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The authoritative merged collection, unique by id.
    pub notes: Collection,
    /// What happened to each incoming note.
    pub stats: MergeStats,
}

/// Id-keyed working set that keeps first-appearance order.
struct WorkingSet {
    slots: Vec<Note>,
    index: HashMap<NoteId, usize>,
}

impl WorkingSet {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    fn get(&self, id: &NoteId) -> Option<&Note> {
        self.index.get(id).map(|&slot| &self.slots[slot])
    }

    /// Inserts or overwrites; returns true if an entry was overwritten.
    fn put(&mut self, note: Note) -> bool {
        match self.index.get(&note.id) {
            Some(&slot) => {
                self.slots[slot] = note;
                true
            }
            None => {
                self.index.insert(note.id.clone(), self.slots.len());
                self.slots.push(note);
                false
            }
        }
    }

    fn into_collection(self) -> Collection {
        Collection::from(self.slots)
    }
}

/// Merges `incoming` into `current`.
///
/// 1. Every note of `current` seeds the working set; a repeated id
///    overwrites the earlier one.
/// 2. Each note of `incoming`, in order, is admitted if its id is new and
///    replaces the entry only if its `updatedAt` is strictly greater.
/// 3. The working set is the result.
///
/// The result has unique ids, at most `current.len() + incoming.len()`
/// notes, and keeps first-appearance order: stored notes first, then new
/// ids in the order they arrived. A replaced note keeps its position.
pub fn reconcile(current: Collection, incoming: Collection) -> Reconciliation {
    let mut working = WorkingSet::with_capacity(current.len() + incoming.len());
    let mut stats = MergeStats::default();

    for note in current {
        if working.put(note) {
            stats.collapsed += 1;
        }
    }

    for note in incoming {
        match resolve(working.get(&note.id), &note) {
            Resolution::Insert => {
                working.put(note);
                stats.inserted += 1;
            }
            Resolution::AcceptIncoming => {
                working.put(note);
                stats.updated += 1;
            }
            Resolution::KeepStored => stats.kept += 1,
        }
    }

    Reconciliation {
        notes: working.into_collection(),
        stats,
    }
}
