//! # notesync testkit
//!
//! Test utilities for notesync.
//!
//! This crate provides:
//! - Fixtures: temporary file stores and a backend that fails on demand
//! - Property-based test generators using proptest
//! - Concurrent submission stress helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notesync_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     let fixture = TempStore::new();
//!     fixture.sync().submit_notes(sample_collection()).unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
