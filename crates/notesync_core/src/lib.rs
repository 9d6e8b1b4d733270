//! # notesync core
//!
//! Note model, reconciliation and persistence for the notesync server.
//!
//! This crate provides:
//! - [`Note`], [`NoteId`] and [`UpdatedAt`], the typed note record
//! - [`Collection`], a set of notes as exchanged with clients
//! - [`reconcile`], the last-writer-wins merge of two collections
//! - [`NoteStore`], JSON persistence over any [`StorageBackend`]
//! - [`NoteSync`], the serialized load → reconcile → replace sequence
//!
//! # Reconciliation
//!
//! Notes are keyed by `id`. For an id present on both sides the note with
//! the strictly greater `updatedAt` survives; on a tie the stored note is
//! kept. Notes with an id the store has never seen are always admitted.
//!
//! ```rust
//! use notesync_core::{reconcile, Collection, Note};
//!
//! let current = Collection::from(vec![Note::new(1, 5).with_field("text", "a")]);
//! let incoming = Collection::from(vec![Note::new(1, 3).with_field("text", "b")]);
//!
//! let merged = reconcile(current, incoming);
//! assert_eq!(merged.notes.len(), 1);
//! assert_eq!(merged.stats.kept, 1);
//! ```
//!
//! [`StorageBackend`]: notesync_storage::StorageBackend

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod collection;
mod error;
mod note;
mod reconcile;
mod store;
mod sync;

pub use collection::Collection;
pub use error::{CoreError, CoreResult};
pub use note::{Note, NoteId, UpdatedAt};
pub use reconcile::{reconcile, resolve, MergeStats, Reconciliation, Resolution};
pub use store::{NoteStore, Snapshot};
pub use sync::{NoteSync, SubmitOutcome};

/// Crate version, reported by the health endpoint and the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
