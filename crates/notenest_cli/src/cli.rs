//! Command-line definitions.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use notenest_core::db::DEFAULT_DB_FILE_NAME;
use notenest_core::NoteId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notenest")]
#[command(about = "Keep short text notes in a local SQLite file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database file to open (created when missing)
    #[arg(long, global = true, env = "NOTENEST_DB", default_value = DEFAULT_DB_FILE_NAME)]
    pub db: PathBuf,

    /// Keep rows and apply migrations instead of resetting on schema mismatch
    #[arg(
        long,
        global = true,
        env = "NOTENEST_MIGRATE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub migrate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "NOTENEST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr otherwise
    #[arg(long, global = true, env = "NOTENEST_LOG_DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a new note
    Add {
        /// Note title
        title: String,
        /// Note content
        content: String,
    },

    /// List all notes in creation order
    List {
        /// Print notes as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show one note
    Show {
        /// Note ID
        id: NoteId,
    },

    /// Replace the title and content of a note
    Update {
        /// Note ID
        id: NoteId,
        /// New title
        title: String,
        /// New content
        content: String,
    },

    /// Delete a note
    Delete {
        /// Note ID
        id: NoteId,
    },

    /// Show database and schema details
    Info,
}

impl Command {
    /// Subcommand name, safe to log.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::List { .. } => "list",
            Self::Show { .. } => "show",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Info => "info",
        }
    }
}
