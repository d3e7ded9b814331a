//! # Nao CLI Module
//!
//! This module implements the CLI interface for Nao.
//!
//! ## Available Commands
//!
//! - `init` - Create the database file and every bucket
//! - `status` - Record count and last identifier per bucket
//! - `get` - Print one record
//! - `list` - Print every record of a bucket
//! - `create` - Create records from a JSON file
//! - `update` - Replace records from a JSON file
//! - `delete` - Remove one record
//! - `reset` - Drop and recreate every bucket

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use nao_core::{EntityKind, NaoError};
use std::path::PathBuf;
use thiserror::Error;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Nao - media database admin
///
/// Inspect and maintain the entity buckets of a Nao database.
#[derive(Parser, Debug)]
#[command(name = "nao")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the database (overrides config file and NAO_DATABASE)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new database with every bucket
    Init {
        /// Delete an existing database file first
        #[arg(short, long)]
        force: bool,
    },

    /// Show record counts per bucket
    Status,

    /// Print the record with the given identifier
    Get {
        /// Entity kind, e.g. media or media-producer
        kind: EntityKind,
        /// Record identifier
        id: u64,
    },

    /// Print every record of a bucket
    List {
        /// Entity kind, e.g. media or media-producer
        kind: EntityKind,
    },

    /// Create records from a JSON file (one object or an array)
    Create {
        /// Entity kind, e.g. media or media-producer
        kind: EntityKind,
        /// Path to the input file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace records from a JSON file (one object or an array)
    Update {
        /// Entity kind, e.g. media or media-producer
        kind: EntityKind,
        /// Path to the input file
        #[arg(short, long)]
        file: PathBuf,
        /// Reject records whose Version is not the stored one
        #[arg(long)]
        checked: bool,
    },

    /// Delete the record with the given identifier
    Delete {
        /// Entity kind, e.g. media or media-producer
        kind: EntityKind,
        /// Record identifier
        id: u64,
    },

    /// Drop and recreate every bucket, destroying all data
    Reset {
        /// Required; reset refuses to run without it
        #[arg(long)]
        force: bool,
    },
}

// =============================================================================
// ERRORS
// =============================================================================

/// Failures of the command layer.
#[derive(Debug, Error)]
pub enum CliError {
    /// The engine rejected the operation.
    #[error(transparent)]
    Nao(#[from] NaoError),

    /// A file could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An input file is not valid JSON for the requested kind.
    #[error("{}: {source}", .path.display())]
    Input {
        /// File involved.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A record could not be rendered as JSON.
    #[error("render output: {0}")]
    Render(#[source] serde_json::Error),

    /// The config file is malformed.
    #[error("config: {0}")]
    Config(String),

    /// The command needs an explicit confirmation or a precondition failed.
    #[error("{0}")]
    Refused(String),
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), CliError> {
    let config = Config::resolve(cli.config.as_deref(), cli.database)?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::Get { kind, id }) => cmd_get(&config, kind, id),
        Some(Commands::List { kind }) => cmd_list(&config, kind),
        Some(Commands::Create { kind, file }) => cmd_create(&config, kind, &file, json_mode),
        Some(Commands::Update {
            kind,
            file,
            checked,
        }) => cmd_update(&config, kind, &file, checked, json_mode),
        Some(Commands::Delete { kind, id }) => cmd_delete(&config, kind, id, json_mode),
        Some(Commands::Reset { force }) => cmd_reset(&config, force),
        None => {
            // No subcommand - show status by default
            cmd_status(&config, json_mode)
        }
    }
}
