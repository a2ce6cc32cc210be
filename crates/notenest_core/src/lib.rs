//! Core persistence logic for NoteNest.
//! This crate owns the `notes` schema and every rule about stored notes.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{close_db, open_db, open_db_in_memory, open_db_with_policy, DbError, SchemaPolicy};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status, LogTarget};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{NoteService, NoteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
