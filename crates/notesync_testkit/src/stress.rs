//! Concurrent submission helpers.
//!
//! These drive one [`NoteSync`] from several threads at once to check that
//! merges are serialized and no submission is lost.

use notesync_core::{Collection, Note, NoteSync};
use notesync_storage::StorageBackend;
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Submissions that returned `Ok`.
    pub successful_ops: usize,
    /// Submissions that returned `Err`.
    pub failed_ops: usize,
    /// Wall-clock duration.
    pub duration: Duration,
}

impl StressTestResult {
    /// Total submissions attempted.
    pub fn total_ops(&self) -> usize {
        self.successful_ops + self.failed_ops
    }
}

/// Configuration for stress runs.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of submitting threads.
    pub threads: usize,
    /// Submissions per thread.
    pub submissions_per_thread: usize,
    /// Notes per submission.
    pub notes_per_submission: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            submissions_per_thread: 25,
            notes_per_submission: 8,
        }
    }
}

/// Builds the submission thread `thread` sends as its `round`-th request.
///
/// Every thread writes its own ids and also touches a shared id range, so
/// both disjoint inserts and overlapping updates happen concurrently.
pub fn submission_for(config: &StressConfig, thread: usize, round: usize) -> Collection {
    let stamp = (round * config.threads + thread) as i64;
    (0..config.notes_per_submission)
        .map(|i| {
            let id = if i % 2 == 0 {
                format!("shared-{i}")
            } else {
                format!("t{thread}-r{round}-{i}")
            };
            Note::new(id, stamp).with_field("writer", thread as i64)
        })
        .collect()
}

/// Runs concurrent submissions against `sync` and returns the counts.
pub fn stress_concurrent_submits<B: StorageBackend>(
    sync: &NoteSync<B>,
    config: &StressConfig,
) -> StressTestResult {
    let barrier = Barrier::new(config.threads);
    let start = Instant::now();

    let outcomes: Vec<(usize, usize)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..config.threads)
            .map(|t| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    let mut ok = 0;
                    let mut failed = 0;
                    for round in 0..config.submissions_per_thread {
                        match sync.submit_notes(submission_for(config, t, round)) {
                            Ok(_) => ok += 1,
                            Err(_) => failed += 1,
                        }
                    }
                    (ok, failed)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or((0, config.submissions_per_thread)))
            .collect()
    });

    StressTestResult {
        successful_ops: outcomes.iter().map(|(ok, _)| ok).sum(),
        failed_ops: outcomes.iter().map(|(_, failed)| failed).sum(),
        duration: start.elapsed(),
    }
}
