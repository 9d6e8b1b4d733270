//! # notesync server
//!
//! HTTP endpoint for note synchronization.
//!
//! This crate provides:
//! - HTTP endpoints (`GET /notes`, `POST /notes`, `GET /health`)
//! - Validation of submitted payloads before any merge runs
//! - Mapping of failures to structured JSON error responses
//!
//! # Architecture
//!
//! [`RequestHandler`] is transport-independent: it takes raw request bodies
//! and returns typed responses or a [`ServerError`]. The axum [`router`]
//! moves each call onto the blocking pool and turns the outcome into a
//! status code and JSON body. [`SyncServer`] binds a listener and serves
//! the router until Ctrl-C.
//!
//! # Protocol
//!
//! 1. Client fetches the server collection with `GET /notes`
//! 2. Client submits its local collection with `POST /notes`
//! 3. Server merges last-writer-wins by `updatedAt` and replies
//!    `{ "success": true, "mergedCount": N }`
//!
//! ```rust,no_run
//! use notesync_server::{ServerConfig, SyncServer};
//!
//! # async fn run() -> notesync_server::ServerResult<()> {
//! let config = ServerConfig::from_env()?;
//! SyncServer::open(config)?.run().await
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod http;
mod server;
mod wire;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{parse_submission, RequestHandler};
pub use http::router;
pub use server::SyncServer;
pub use wire::{ErrorResponse, HealthResponse, SubmitResponse};
