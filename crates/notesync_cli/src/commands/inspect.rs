//! Inspect command implementation.

use crate::Format;
use notesync_core::{NoteId, NoteStore, UpdatedAt};
use notesync_storage::{FileBackend, StorageBackend};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Data file inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Data file path.
    pub path: String,
    /// File size in bytes.
    pub size: u64,
    /// Number of notes.
    pub note_count: usize,
    /// Number of ids that occur more than once.
    pub duplicate_ids: usize,
    /// Number of stored records that are not notes.
    pub unrecognized: usize,
    /// One entry per note, in file order.
    pub notes: Vec<NoteSummary>,
}

/// One line of the inspection report.
#[derive(Debug, Serialize)]
pub struct NoteSummary {
    /// Note id.
    pub id: NoteId,
    /// Note timestamp, if present.
    #[serde(rename = "updatedAt", skip_serializing_if = "UpdatedAt::is_missing")]
    pub updated_at: UpdatedAt,
    /// Number of payload fields.
    pub fields: usize,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => print_text_output(&result),
    }
    Ok(())
}

/// Reads the data file and summarizes it.
///
/// Fails if the file is missing or does not hold a JSON array of notes.
pub fn inspect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No data file found at {}", path.display()).into());
    }

    let backend = FileBackend::open(path)?;
    let size = backend.size()?;
    let snapshot = NoteStore::new(backend).try_load_snapshot()?;
    let notes = snapshot.notes;

    let mut seen = HashSet::new();
    let duplicate_ids = notes.iter().filter(|note| !seen.insert(&note.id)).count();

    Ok(InspectResult {
        path: path.display().to_string(),
        size,
        note_count: notes.len(),
        duplicate_ids,
        unrecognized: snapshot.unrecognized.len(),
        notes: notes
            .iter()
            .map(|note| NoteSummary {
                id: note.id.clone(),
                updated_at: note.updated_at.clone(),
                fields: note.payload.len(),
            })
            .collect(),
    })
}

fn print_text_output(result: &InspectResult) {
    println!("Data file: {}", result.path);
    println!("  Size:          {} bytes", result.size);
    println!("  Notes:         {}", result.note_count);
    println!("  Duplicate ids: {}", result.duplicate_ids);
    println!("  Unrecognized:  {}", result.unrecognized);

    if !result.notes.is_empty() {
        println!();
        println!("  {:<38} {:<26} FIELDS", "ID", "UPDATED AT");
        for note in &result.notes {
            let stamp = match &note.updated_at {
                UpdatedAt::Missing => "-".to_owned(),
                UpdatedAt::Number(n) => n.to_string(),
                UpdatedAt::Text(s) => s.clone(),
                UpdatedAt::Other(v) => v.to_string(),
            };
            println!("  {:<38} {:<26} {}", note.id.to_string(), stamp, note.fields);
        }
    }
}
