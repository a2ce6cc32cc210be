//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete entry points for callers.
//! - Read back created notes so callers receive the persisted shape.
//! - Emit metadata-only log events for every mutation.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Titles and contents are never written to logs.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Persistence-layer failure, including validation.
    Repo(RepoError),
    /// The note was stored but reading it back failed.
    ReadBackFailed { note_id: NoteId, source: RepoError },
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::ReadBackFailed { note_id, source } => {
                write!(f, "note {note_id} was stored but could not be read back: {source}")
            }
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) | Self::ReadBackFailed { source: err, .. } => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl NoteServiceError {
    /// Id of a note that was persisted despite the error, if any.
    ///
    /// Callers must not retry a create that reports `Some`.
    pub fn created_note_id(&self) -> Option<NoteId> {
        match self {
            Self::ReadBackFailed { note_id, .. } => Some(*note_id),
            Self::Repo(_) | Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note and returns it as stored.
    pub fn create_note(
        &self,
        title: &str,
        content: Option<&str>,
    ) -> Result<Note, NoteServiceError> {
        let note_id = self
            .repo
            .create_note(title, content)
            .inspect_err(|err| log_failure("note_create", err))?;
        info!("event=note_create module=service status=ok note_id={note_id}");

        let read_back = self.repo.get_note(note_id).map_err(|err| {
            log_failure("note_create_read_back", &err);
            NoteServiceError::ReadBackFailed {
                note_id,
                source: err,
            }
        })?;
        read_back.ok_or_else(|| {
            error!(
                "event=note_create_read_back module=service status=error error_code=missing_row note_id={note_id}"
            );
            NoteServiceError::InconsistentState("created note not found in read-back")
        })
    }

    /// Gets one note by id.
    pub fn get_note(&self, note_id: NoteId) -> RepoResult<Option<Note>> {
        self.repo
            .get_note(note_id)
            .inspect_err(|err| log_failure("note_get", err))
    }

    /// Lists all notes in creation order.
    pub fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let notes = self
            .repo
            .list_notes()
            .inspect_err(|err| log_failure("note_list", err))?;
        debug!(
            "event=note_list module=service status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    /// Replaces title and content; returns affected rows.
    ///
    /// `0` means no note has `note_id`.
    pub fn update_note(
        &self,
        note_id: NoteId,
        title: &str,
        content: Option<&str>,
    ) -> Result<usize, NoteServiceError> {
        let affected = self
            .repo
            .update_note(note_id, title, content)
            .inspect_err(|err| log_failure("note_update", err))?;
        info!("event=note_update module=service status=ok note_id={note_id} affected={affected}");
        Ok(affected)
    }

    /// Deletes one note; returns affected rows.
    ///
    /// `0` means no note has `note_id`.
    pub fn delete_note(&self, note_id: NoteId) -> Result<usize, NoteServiceError> {
        let affected = self
            .repo
            .delete_note(note_id)
            .inspect_err(|err| log_failure("note_delete", err))?;
        info!("event=note_delete module=service status=ok note_id={note_id} affected={affected}");
        Ok(affected)
    }

    /// Returns the number of stored notes.
    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo
            .count_notes()
            .inspect_err(|err| log_failure("note_count", err))
    }
}

fn log_failure(event: &str, err: &RepoError) {
    error!(
        "event={event} module=service status=error error_code={} error={}",
        err.code(),
        err
    );
}
