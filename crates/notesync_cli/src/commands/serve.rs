//! Serve command implementation.

use notesync_server::{ServerConfig, ServerResult, SyncServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

/// Builds the server configuration from the environment, then applies the
/// command-line overrides.
///
/// # Errors
///
/// Returns an error if an environment variable is malformed.
pub fn config<F>(
    lookup: F,
    data_file: Option<PathBuf>,
    bind: Option<SocketAddr>,
    port: Option<u16>,
) -> ServerResult<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ServerConfig::from_lookup(lookup)?;
    if let Some(path) = data_file {
        config = config.with_data_file(path);
    }
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    Ok(config)
}

/// Runs the server until Ctrl-C.
pub fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        bind = %config.bind_addr,
        data_file = %config.data_file.display(),
        "starting note sync server"
    );

    let server = SyncServer::open(config)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server.run())?;
    Ok(())
}
