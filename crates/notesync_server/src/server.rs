//! Server lifecycle.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::RequestHandler;
use crate::http::router;
use axum::Router;
use notesync_storage::{FileBackend, StorageBackend};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// The note sync HTTP server.
pub struct SyncServer {
    handler: Arc<RequestHandler>,
}

impl SyncServer {
    /// Creates a server over the given backend.
    pub fn new<B>(config: ServerConfig, backend: B) -> Self
    where
        B: StorageBackend + 'static,
    {
        Self {
            handler: Arc::new(RequestHandler::new(config, backend)),
        }
    }

    /// Creates a server persisting to `config.data_file`.
    ///
    /// Parent directories are created as needed. The data file is locked
    /// for the lifetime of the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be opened or is already
    /// locked by another process.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let backend = FileBackend::open_with_create_dirs(&config.data_file)
            .map_err(notesync_core::CoreError::from)?;
        info!(path = %config.data_file.display(), "opened note store");
        Ok(Self::new(config, backend))
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        self.handler.config()
    }

    /// Returns the request handler.
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    /// Returns the HTTP router.
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.handler))
    }

    /// Binds `config.bind_addr` and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config().bind_addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` completes.
    ///
    /// In-flight requests are allowed to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(%addr, "note sync server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("note sync server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
