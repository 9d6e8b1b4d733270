//! Submissions racing on one store must serialize.

use notesync_core::{reconcile, Collection, CoreError, Note, NoteSync, NoteStore};
use notesync_storage::InMemoryBackend;
use notesync_testkit::prelude::*;
use std::sync::Barrier;
use std::thread;

fn serial(current: &Collection, first: &Collection, second: &Collection) -> Collection {
    let once = reconcile(current.clone(), first.clone()).notes;
    reconcile(once, second.clone()).notes
}

#[test]
fn two_racing_submissions_apply_in_some_serial_order() {
    let current = Collection::from(vec![
        Note::new(1, 5).with_field("text", "base"),
        Note::new(2, 5).with_field("text", "base"),
    ]);
    let first = Collection::from(vec![
        Note::new(1, 8).with_field("text", "first"),
        Note::new(3, 1).with_field("text", "first"),
    ]);
    let second = Collection::from(vec![
        Note::new(1, 7).with_field("text", "second"),
        Note::new(2, 9).with_field("text", "second"),
        Note::new(4, 1).with_field("text", "second"),
    ]);

    let one_then_two = serial(&current, &first, &second);
    let two_then_one = serial(&current, &second, &first);

    for _ in 0..50 {
        let sync = NoteSync::new(InMemoryBackend::new());
        sync.store().replace_all(&current).unwrap();
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            for batch in [&first, &second] {
                let sync = &sync;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    sync.submit_notes(batch.clone()).unwrap();
                });
            }
        });

        let stored = sync.get_notes();
        assert!(
            stored == one_then_two || stored == two_then_one,
            "lost update: {stored:?}"
        );
        assert_eq!(stored.len(), 4);
    }
}

#[test]
fn stress_on_file_store_loses_no_inserts() {
    let fixture = TempStore::new();
    let config = StressConfig::default();

    let result = stress_concurrent_submits(fixture.sync(), &config);

    assert_eq!(result.failed_ops, 0);
    assert_eq!(
        result.total_ops(),
        config.threads * config.submissions_per_thread
    );

    // Every odd slot is unique per (thread, round); even slots share ids.
    let unique_per_submission = config.notes_per_submission / 2;
    let shared = config.notes_per_submission - unique_per_submission;
    let expected = result.successful_ops * unique_per_submission + shared;

    let stored = fixture.sync().get_notes();
    assert_eq!(stored.len(), expected);
}

#[test]
fn stress_shared_ids_hold_newest_timestamp() {
    let fixture = TempStore::new();
    let config = StressConfig {
        threads: 3,
        submissions_per_thread: 10,
        notes_per_submission: 4,
    };

    stress_concurrent_submits(fixture.sync(), &config);

    let newest = ((config.submissions_per_thread - 1) * config.threads + config.threads - 1) as i64;
    let stored = fixture.sync().get_notes();
    for note in stored.iter().filter(|n| n.id.to_string().contains("shared")) {
        assert_eq!(note.updated_at, newest.into());
    }
}

#[test]
fn failed_write_leaves_store_untouched() {
    let before = sample_collection();
    let backend = FailingBackend::failing_with_data(encode(&before));
    let sync = NoteSync::with_store(NoteStore::new(backend));

    let result = sync.submit_notes(Collection::from(vec![Note::new(99, 1)]));

    assert!(matches!(result, Err(CoreError::Storage(_))));
    assert_eq!(sync.store().backend().attempted_writes(), 1);
    assert_eq!(sync.get_notes(), before);
}

#[test]
fn store_recovers_after_write_failure() {
    let backend = FailingBackend::failing();
    let sync = NoteSync::new(backend);

    assert!(sync.submit_notes(sample_collection()).is_err());
    assert!(sync.get_notes().is_empty());

    sync.store().backend().set_failing(false);
    let outcome = sync.submit_notes(sample_collection()).unwrap();
    assert_eq!(outcome.merged_count, 3);
}
