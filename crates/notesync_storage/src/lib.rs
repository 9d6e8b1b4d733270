//! # notesync storage
//!
//! Storage backends for the notesync server.
//!
//! A backend holds exactly **one opaque blob**: the serialized note
//! collection. It never interprets the bytes; encoding and decoding belong
//! to `notesync_core`.
//!
//! ## Design Principles
//!
//! - Whole-blob reads and whole-blob replaces, no partial addressing
//! - A replace is atomic: readers see the old blob or the new one
//! - Backends must be `Send + Sync` so one instance can serve every request
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For tests and ephemeral servers
//! - [`FileBackend`] - Persistent storage using write-temp-then-rename
//!
//! ## Example
//!
//! ```rust
//! use notesync_storage::{StorageBackend, InMemoryBackend};
//!
//! let backend = InMemoryBackend::new();
//! assert!(backend.read_all().unwrap().is_none());
//!
//! backend.replace_all(b"[]").unwrap();
//! assert_eq!(backend.read_all().unwrap().as_deref(), Some(&b"[]"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
