//! Merge command implementation.

use notesync_core::{reconcile, MergeStats, NoteStore, NoteSync};
use notesync_server::parse_submission;
use notesync_storage::FileBackend;
use std::path::Path;

/// What a merge did to the data file.
#[derive(Debug, PartialEq, Eq)]
pub struct MergeReport {
    /// Notes read from the input file.
    pub received: usize,
    /// Notes in the data file after the merge.
    pub merged_count: usize,
    /// Per-note counters.
    pub stats: MergeStats,
}

/// Runs the merge command.
pub fn run(data_file: &Path, input: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Merging {} into {}", input.display(), data_file.display());
    if dry_run {
        println!("(dry run - no changes will be made)");
    }

    let report = merge(data_file, input, dry_run)?;

    println!();
    println!("  Received: {}", report.received);
    println!("  Inserted: {}", report.stats.inserted);
    println!("  Updated:  {}", report.stats.updated);
    println!("  Kept:     {}", report.stats.kept);
    println!("  Merged:   {}", report.merged_count);
    Ok(())
}

/// Merges the notes in `input` into `data_file`.
///
/// The input is validated exactly like a `POST /notes` body. Unlike the
/// server, an unreadable data file is an error rather than an empty store.
pub fn merge(
    data_file: &Path,
    input: &Path,
    dry_run: bool,
) -> Result<MergeReport, Box<dyn std::error::Error>> {
    let body = std::fs::read(input)
        .map_err(|e| format!("cannot read {}: {e}", input.display()))?;
    let incoming = parse_submission(&body, usize::MAX)?;
    let received = incoming.len();

    let store = NoteStore::new(FileBackend::open_with_create_dirs(data_file)?);
    let current = store.try_load_all()?;

    if dry_run {
        let merged = reconcile(current, incoming);
        return Ok(MergeReport {
            received,
            merged_count: merged.notes.len(),
            stats: merged.stats,
        });
    }

    let outcome = NoteSync::with_store(store).submit_notes(incoming)?;
    Ok(MergeReport {
        received,
        merged_count: outcome.merged_count,
        stats: outcome.stats,
    })
}
