//! Property-based test generators using proptest.
//!
//! Ids are drawn from a small domain so generated collections overlap
//! often enough to exercise the conflict paths of the reconciler.

use notesync_core::{Collection, Note, NoteId, UpdatedAt};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::HashSet;

/// Strategy for note ids: small integers and short strings.
pub fn note_id_strategy() -> impl Strategy<Value = NoteId> {
    prop_oneof![
        3 => (0i64..16).prop_map(NoteId::Int),
        2 => prop::string::string_regex("[a-d]{1,2}")
            .expect("Invalid regex")
            .prop_map(NoteId::Text),
    ]
}

/// Strategy for `updatedAt` values of every supported shape.
pub fn updated_at_strategy() -> impl Strategy<Value = UpdatedAt> {
    prop_oneof![
        6 => (0i64..20).prop_map(UpdatedAt::from),
        2 => prop::string::string_regex("2024-0[1-9]-0[1-9]")
            .expect("Invalid regex")
            .prop_map(UpdatedAt::Text),
        1 => Just(UpdatedAt::Missing),
        1 => Just(UpdatedAt::Other(Value::Null)),
    ]
}

/// Strategy for a single note with a small opaque payload.
pub fn note_strategy() -> impl Strategy<Value = Note> {
    (
        note_id_strategy(),
        updated_at_strategy(),
        prop::option::of("[a-z ]{0,12}"),
    )
        .prop_map(|(id, updated_at, text)| {
            let note = Note::new(id, updated_at);
            match text {
                Some(text) => note.with_field("text", text),
                None => note,
            }
        })
}

/// Strategy for collections that may repeat ids.
pub fn collection_strategy(max_len: usize) -> impl Strategy<Value = Collection> {
    prop::collection::vec(note_strategy(), 0..=max_len).prop_map(Collection::from)
}

/// Strategy for collections with unique ids, as the store holds them.
pub fn unique_collection_strategy(max_len: usize) -> impl Strategy<Value = Collection> {
    prop::collection::vec(note_strategy(), 0..=max_len).prop_map(|notes| {
        let mut seen = HashSet::new();
        notes
            .into_iter()
            .filter(|note| seen.insert(note.id.clone()))
            .collect()
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
