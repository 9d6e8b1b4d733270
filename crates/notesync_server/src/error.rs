//! Error types for the sync server.

use crate::wire::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use notesync_core::CoreError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the sync server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request body is not a JSON array of notes.
    #[error("{0}")]
    InvalidRequest(String),

    /// The submission holds more notes than the server accepts at once.
    #[error("too many notes in one request: {count} (limit {max})")]
    TooManyNotes {
        /// Notes in the request.
        count: usize,
        /// Configured limit.
        max: usize,
    },

    /// Loading or persisting the collection failed.
    #[error("storage error: {0}")]
    Storage(#[from] CoreError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::InvalidRequest(_) | ServerError::TooManyNotes { .. }
        )
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message shown to the client.
    ///
    /// Client errors describe the problem; server errors are replaced by
    /// `fallback` so internal details stay in the log.
    pub fn public_message(&self, fallback: &str) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            fallback.to_owned()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.public_message("Internal server error."));
        (self.status_code(), Json(body)).into_response()
    }
}
