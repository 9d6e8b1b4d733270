//! notesync CLI
//!
//! Runs the note sync server and works with its data file.
//!
//! # Commands
//!
//! - `serve` - Run the HTTP sync server
//! - `inspect` - Show the notes held in the data file
//! - `merge` - Merge a JSON array of notes into the data file
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use notesync_server::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Note synchronization server and tools.
#[derive(Parser)]
#[command(name = "notesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the notes data file [default: notes.json]
    #[arg(global = true, short, long, env = "NOTESYNC_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP sync server
    Serve {
        /// Address to bind, e.g. 127.0.0.1:4000
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the notes held in the data file
    Inspect {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Merge a JSON array of notes into the data file
    Merge {
        /// File holding the notes to merge
        input: PathBuf,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve { bind, port } => {
            let config =
                commands::serve::config(|key| std::env::var(key).ok(), cli.data_file, bind, port)?;
            commands::serve::run(config)?;
        }
        Commands::Inspect { format } => {
            commands::inspect::run(&data_file_path(cli.data_file), format)?;
        }
        Commands::Merge { input, dry_run } => {
            commands::merge::run(&data_file_path(cli.data_file), &input, dry_run)?;
        }
        Commands::Version => {
            println!("notesync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("notesync core v{}", notesync_core::VERSION);
        }
    }

    Ok(())
}

/// Data file for the offline commands: the flag or `NOTESYNC_DATA_FILE`,
/// else the server default.
fn data_file_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| ServerConfig::default().data_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_commands_use_default_data_file() {
        assert_eq!(data_file_path(None), PathBuf::from("notes.json"));
        assert_eq!(
            data_file_path(Some(PathBuf::from("/srv/notes.json"))),
            PathBuf::from("/srv/notes.json")
        );
    }

    #[test]
    fn parses_global_data_file_after_subcommand() {
        let cli = Cli::try_parse_from(["notesync", "inspect", "--data-file", "x.json"]).unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("x.json")));
        assert!(matches!(cli.command, Commands::Inspect { format: Format::Text }));
    }

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from(["notesync", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { bind: None, port: Some(8080) }));
    }
}
