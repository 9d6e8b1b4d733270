//! JSON bodies exchanged with clients.

use serde::{Deserialize, Serialize};

/// Reply to a successful `POST /notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Always `true`; failures use [`ErrorResponse`].
    pub success: bool,
    /// Number of notes stored after the merge.
    pub merged_count: usize,
}

impl SubmitResponse {
    /// Creates a success reply.
    pub fn merged(merged_count: usize) -> Self {
        Self {
            success: true,
            merged_count,
        }
    }
}

/// Body of every non-2xx reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Reply to `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` while the server is serving.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Number of stored notes.
    pub notes: usize,
}
