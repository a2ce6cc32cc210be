//! Command handlers: validate input, run one store operation, report.

use crate::cli::Command;
use crate::output::{format_note, format_note_list};
use anyhow::{Context, Result};
use notenest_core::db::migrations::stored_version;
use notenest_core::{core_version, NoteId, NoteService, SqliteNoteRepository};
use rusqlite::Connection;
use std::io::Write;
use std::path::Path;

const ADD_INPUT_MESSAGE: &str = "Please enter both title and content";
const UPDATE_INPUT_MESSAGE: &str = "Please enter ID, new title, and new content for update";

/// How a handled command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// The target id matched no note.
    NotFound,
    /// Input was rejected before touching the store.
    InvalidInput,
}

impl Status {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NotFound => 1,
            Self::InvalidInput => 2,
        }
    }
}

/// Runs one command against an opened connection.
///
/// Regular output goes to `out`; user-facing rejections go to `err`.
/// Store failures are returned as errors.
pub fn execute(
    conn: &Connection,
    db_path: &Path,
    command: Command,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<Status> {
    let repo = SqliteNoteRepository::try_new(conn)?;
    let service = NoteService::new(repo);

    match command {
        Command::Add { title, content } => {
            let (title, content) = (title.trim(), content.trim());
            if title.is_empty() || content.is_empty() {
                writeln!(err, "{ADD_INPUT_MESSAGE}")?;
                return Ok(Status::InvalidInput);
            }

            let note_id = match service.create_note(title, Some(content)) {
                Ok(note) => note.id,
                Err(create_err) => match create_err.created_note_id() {
                    Some(note_id) => {
                        writeln!(err, "Warning: {create_err}")?;
                        note_id
                    }
                    None => return Err(create_err).context("Error adding note"),
                },
            };
            writeln!(out, "Note added with ID: {note_id}")?;
            Ok(Status::Success)
        }
        Command::List { json } => {
            let notes = service.list_notes().context("Error viewing notes")?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&notes)?)?;
            } else {
                writeln!(out, "{}", format_note_list(&notes))?;
            }
            Ok(Status::Success)
        }
        Command::Show { id } => match service.get_note(id).context("Error viewing note")? {
            Some(note) => {
                writeln!(out, "{}", format_note(&note))?;
                Ok(Status::Success)
            }
            None => not_found(err, id),
        },
        Command::Update { id, title, content } => {
            let (title, content) = (title.trim(), content.trim());
            if title.is_empty() || content.is_empty() {
                writeln!(err, "{UPDATE_INPUT_MESSAGE}")?;
                return Ok(Status::InvalidInput);
            }

            let count = service
                .update_note(id, title, Some(content))
                .context("Error updating note")?;
            if count == 0 {
                return not_found(err, id);
            }
            writeln!(out, "Note(s) updated: {count}")?;
            Ok(Status::Success)
        }
        Command::Delete { id } => {
            let count = service.delete_note(id).context("Error deleting note")?;
            if count == 0 {
                return not_found(err, id);
            }
            writeln!(out, "Note(s) deleted: {count}")?;
            Ok(Status::Success)
        }
        Command::Info => {
            writeln!(out, "database: {}", db_path.display())?;
            writeln!(out, "schema_version: {}", stored_version(conn)?)?;
            writeln!(out, "notes: {}", service.count_notes()?)?;
            writeln!(out, "core_version: {}", core_version())?;
            Ok(Status::Success)
        }
    }
}

fn not_found(err: &mut impl Write, id: NoteId) -> Result<Status> {
    writeln!(err, "No note found with ID: {id}")?;
    Ok(Status::NotFound)
}
