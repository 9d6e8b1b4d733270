//! Request handlers for the note endpoints.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::wire::{HealthResponse, SubmitResponse};
use notesync_core::{Collection, Note, NoteSync, VERSION};
use notesync_storage::StorageBackend;
use serde_json::Value;
use tracing::debug;

/// Storage backend type held by the server.
pub(crate) type DynBackend = Box<dyn StorageBackend>;

/// Message for a body that is valid JSON but not an array.
pub(crate) const NOT_AN_ARRAY: &str = "Expected an array of notes";

/// Transport-independent handler for the note endpoints.
pub struct RequestHandler {
    config: ServerConfig,
    sync: NoteSync<DynBackend>,
}

impl RequestHandler {
    /// Creates a handler over the given backend.
    pub fn new<B>(config: ServerConfig, backend: B) -> Self
    where
        B: StorageBackend + 'static,
    {
        Self {
            config,
            sync: NoteSync::new(Box::new(backend)),
        }
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the sync service.
    pub fn sync(&self) -> &NoteSync<DynBackend> {
        &self.sync
    }

    /// Handles `GET /notes`.
    pub fn handle_get_notes(&self) -> Collection {
        self.sync.get_notes()
    }

    /// Handles `POST /notes` with the raw request body.
    ///
    /// # Errors
    ///
    /// - [`ServerError::InvalidRequest`] if the body is not a JSON array of notes
    /// - [`ServerError::TooManyNotes`] if the array exceeds the configured limit
    /// - [`ServerError::Storage`] if the merged collection cannot be persisted
    ///
    /// Nothing is stored unless the whole body validates.
    pub fn handle_submit_notes(&self, body: &[u8]) -> ServerResult<SubmitResponse> {
        let incoming = parse_submission(body, self.config.max_notes_per_request)?;
        let outcome = self.sync.submit_notes(incoming)?;
        Ok(SubmitResponse::merged(outcome.merged_count))
    }

    /// Handles `GET /health`.
    pub fn handle_health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".into(),
            version: VERSION.into(),
            notes: self.sync.get_notes().len(),
        }
    }
}

/// Parses a submission body into a collection.
///
/// The body must be a JSON array whose elements are objects with an `id`
/// that is an integer or a string. At most `max_notes` elements are
/// accepted.
///
/// # Errors
///
/// Returns [`ServerError::InvalidRequest`] or [`ServerError::TooManyNotes`].
pub fn parse_submission(body: &[u8], max_notes: usize) -> ServerResult<Collection> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ServerError::InvalidRequest(format!("request body is not valid JSON: {e}")))?;

    let Value::Array(records) = value else {
        return Err(ServerError::InvalidRequest(NOT_AN_ARRAY.into()));
    };

    if records.len() > max_notes {
        return Err(ServerError::TooManyNotes {
            count: records.len(),
            max: max_notes,
        });
    }

    debug!(count = records.len(), "parsing submission");
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<Note>(record)
                .map_err(|e| ServerError::InvalidRequest(format!("note {index} is invalid: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notesync_core::NoteId;
    use notesync_storage::InMemoryBackend;
    use notesync_testkit::{encode, sample_collection, FailingBackend};
    use std::sync::Arc;

    fn handler() -> RequestHandler {
        RequestHandler::new(ServerConfig::default(), InMemoryBackend::new())
    }

    #[test]
    fn parse_accepts_array_of_notes() {
        let notes = parse_submission(br#"[{"id":1,"updatedAt":5},{"id":"b"}]"#, 10).unwrap();
        assert_eq!(
            notes.ids().cloned().collect::<Vec<_>>(),
            vec![NoteId::Int(1), NoteId::from("b")]
        );
    }

    #[test]
    fn parse_accepts_empty_array() {
        assert!(parse_submission(b"[]", 10).unwrap().is_empty());
    }

    #[test]
    fn parse_accepts_fractional_and_large_ids() {
        let notes = parse_submission(br#"[{"id":1.5},{"id":18446744073709551615}]"#, 10).unwrap();
        assert_eq!(notes.len(), 2);
        assert!(matches!(notes.as_slice()[0].id, NoteId::Number(_)));
    }

    #[test]
    fn parse_rejects_non_array() {
        let bodies: [&[u8]; 4] = [br#"{"id":1}"#, b"\"notes\"", b"42", b"null"];
        for body in bodies {
            let err = parse_submission(body, 10).unwrap_err();
            assert_eq!(err.to_string(), NOT_AN_ARRAY);
        }
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let bodies: [&[u8]; 3] = [b"", b"[", b"not json"];
        for body in bodies {
            let err = parse_submission(body, 10).unwrap_err();
            assert!(matches!(err, ServerError::InvalidRequest(_)));
        }
    }

    #[test]
    fn parse_rejects_bad_elements() {
        let err = parse_submission(br#"[{"id":1},{"text":"no id"}]"#, 10).unwrap_err();
        assert!(err.to_string().starts_with("note 1 is invalid"));

        let err = parse_submission(br#"[5]"#, 10).unwrap_err();
        assert!(err.to_string().starts_with("note 0 is invalid"));
    }

    #[test]
    fn parse_enforces_note_limit() {
        let err = parse_submission(br#"[{"id":1},{"id":2},{"id":3}]"#, 2).unwrap_err();
        assert!(matches!(err, ServerError::TooManyNotes { count: 3, max: 2 }));
    }

    #[test]
    fn submit_then_get() {
        let handler = handler();

        let response = handler
            .handle_submit_notes(br#"[{"id":1,"updatedAt":5,"text":"a"}]"#)
            .unwrap();
        assert_eq!(response, SubmitResponse::merged(1));

        let response = handler
            .handle_submit_notes(br#"[{"id":1,"updatedAt":3,"text":"b"},{"id":2}]"#)
            .unwrap();
        assert_eq!(response.merged_count, 2);

        let notes = handler.handle_get_notes();
        let first = notes.get(&NoteId::Int(1)).unwrap();
        assert_eq!(first.field("text"), Some(&serde_json::json!("a")));
    }

    #[test]
    fn rejected_submission_leaves_store_untouched() {
        let backend = Arc::new(FailingBackend::default());
        let handler = RequestHandler::new(ServerConfig::default(), Arc::clone(&backend));

        handler.handle_submit_notes(&encode(&sample_collection())).unwrap();
        let before = backend.data();
        let writes = backend.attempted_writes();

        let err = handler.handle_submit_notes(br#"{"id":9}"#).unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(backend.data(), before);
        assert_eq!(backend.attempted_writes(), writes);
    }

    #[test]
    fn write_failure_is_a_server_error() {
        let backend = Arc::new(FailingBackend::failing());
        let handler = RequestHandler::new(ServerConfig::default(), Arc::clone(&backend));

        let err = handler.handle_submit_notes(br#"[{"id":1}]"#).unwrap_err();
        assert!(matches!(err, ServerError::Storage(_)));
        assert!(err.is_server_error());
        assert!(backend.data().is_none());
    }

    #[test]
    fn health_reports_note_count() {
        let handler = handler();
        handler.handle_submit_notes(&encode(&sample_collection())).unwrap();

        let health = handler.handle_health();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, VERSION);
        assert_eq!(health.notes, 3);
    }
}
