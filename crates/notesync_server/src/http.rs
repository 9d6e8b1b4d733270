//! axum transport for the note endpoints.
//!
//! Every handler call touches the filesystem, so it runs on the blocking
//! pool and the async workers stay free to accept connections.

use crate::error::ServerError;
use crate::handler::RequestHandler;
use crate::wire::ErrorResponse;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::task;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

const LOAD_FAILED: &str = "Server error loading notes.";
const SYNC_FAILED: &str = "Server error during note sync.";

/// Builds the router serving `/notes` and `/health`.
pub fn router(handler: Arc<RequestHandler>) -> Router {
    let config = handler.config().clone();

    let mut router = Router::new()
        .route("/notes", get(get_notes).post(submit_notes))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(handler);

    if config.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

async fn get_notes(State(handler): State<Arc<RequestHandler>>) -> Response {
    match task::spawn_blocking(move || handler.handle_get_notes()).await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => {
            error!(error = %e, "load task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, LOAD_FAILED)
        }
    }
}

async fn submit_notes(State(handler): State<Arc<RequestHandler>>, body: Bytes) -> Response {
    let result = task::spawn_blocking(move || handler.handle_submit_notes(&body))
        .await
        .unwrap_or_else(|e| Err(ServerError::Internal(format!("sync task failed: {e}"))));

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            if e.is_client_error() {
                warn!(error = %e, "rejected submission");
            } else {
                error!(error = %e, "note sync failed");
            }
            error_response(e.status_code(), &e.public_message(SYNC_FAILED))
        }
    }
}

async fn health(State(handler): State<Arc<RequestHandler>>) -> Response {
    match task::spawn_blocking(move || handler.handle_health()).await {
        Ok(health) => (StatusCode::OK, Json(health)).into_response(),
        Err(e) => ServerError::Internal(format!("health task failed: {e}")).into_response(),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
