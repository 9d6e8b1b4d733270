//! Server configuration.

use crate::error::{ServerError, ServerResult};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 4000;

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "notes.json";

/// Configuration for the sync server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// File holding the stored collection.
    pub data_file: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Largest accepted number of notes in one submission.
    pub max_notes_per_request: usize,
    /// Whether to answer cross-origin requests from any origin.
    pub cors_permissive: bool,
}

impl ServerConfig {
    /// Creates a configuration bound to `bind_addr` with default limits.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            max_body_bytes: 10 * 1024 * 1024,
            max_notes_per_request: 100_000,
            cors_permissive: true,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// | Variable             | Meaning                                 |
    /// |----------------------|-----------------------------------------|
    /// | `NOTESYNC_BIND`      | full socket address, e.g. `[::]:4000`   |
    /// | `PORT`               | port on `0.0.0.0`, if no bind address   |
    /// | `NOTESYNC_DATA_FILE` | path of the data file                   |
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if a variable is set but malformed.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup("NOTESYNC_BIND") {
            config.bind_addr = bind
                .parse()
                .map_err(|e| ServerError::Config(format!("NOTESYNC_BIND={bind:?}: {e}")))?;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|e| ServerError::Config(format!("PORT={port:?}: {e}")))?;
            config.bind_addr.set_port(port);
        }

        if let Some(path) = lookup("NOTESYNC_DATA_FILE") {
            if path.is_empty() {
                return Err(ServerError::Config("NOTESYNC_DATA_FILE is empty".into()));
            }
            config.data_file = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Sets the listening port, keeping the bind address.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }

    /// Sets the data file.
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// Sets the maximum request body size.
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Sets the maximum number of notes per submission.
    pub fn with_max_notes_per_request(mut self, max: usize) -> Self {
        self.max_notes_per_request = max;
        self
    }

    /// Enables or disables the permissive CORS layer.
    pub fn with_cors_permissive(mut self, enabled: bool) -> Self {
        self.cors_permissive = enabled;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:4000".parse().unwrap());
        assert_eq!(config.data_file, PathBuf::from("notes.json"));
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
        assert!(config.cors_permissive);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::default()
            .with_port(9000)
            .with_data_file("/tmp/n.json")
            .with_max_body_bytes(1024)
            .with_max_notes_per_request(10)
            .with_cors_permissive(false);

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.data_file, PathBuf::from("/tmp/n.json"));
        assert_eq!(config.max_body_bytes, 1024);
        assert_eq!(config.max_notes_per_request, 10);
        assert!(!config.cors_permissive);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn port_variable() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "8081")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8081".parse().unwrap());
    }

    #[test]
    fn bind_takes_precedence_over_port() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("NOTESYNC_BIND", "127.0.0.1:9999"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9999".parse().unwrap());
    }

    #[test]
    fn data_file_variable() {
        let config =
            ServerConfig::from_lookup(lookup(&[("NOTESYNC_DATA_FILE", "/var/lib/notes.json")]))
                .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/var/lib/notes.json"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for vars in [
            [("PORT", "http")],
            [("PORT", "70000")],
            [("NOTESYNC_BIND", "localhost")],
            [("NOTESYNC_DATA_FILE", "")],
        ] {
            let err = ServerConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, ServerError::Config(_)), "{vars:?}");
        }
    }
}
