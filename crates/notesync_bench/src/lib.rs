//! Benchmark utilities.

use notesync_core::{Collection, Note};
use rand::Rng;

/// Generates `count` notes with ids `0..count` and random timestamps.
pub fn generate_collection(count: usize) -> Collection {
    generate_range(0, count)
}

/// Generates notes with ids `start..start + count` and random timestamps.
pub fn generate_range(start: usize, count: usize) -> Collection {
    let mut rng = rand::thread_rng();
    (start..start + count)
        .map(|id| {
            Note::new(id as i64, rng.gen_range(0..1_000_000_i64))
                .with_field("text", format!("note {id}"))
                .with_field("pinned", rng.gen::<bool>())
        })
        .collect()
}

/// Generates an incoming collection of `count` notes of which the first
/// `overlap_percent` percent reuse ids of [`generate_collection`].
pub fn generate_incoming(stored: usize, count: usize, overlap_percent: usize) -> Collection {
    let shared = (count * overlap_percent / 100).min(stored);
    let mut notes = generate_range(0, shared).into_vec();
    notes.extend(generate_range(stored, count - shared));
    Collection::from(notes)
}
