//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted record shape.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused for another note.
//! - `title` is non-empty after trimming whitespace.
//! - `content` may be absent; an empty string is stored as-is.
//!
//! # See also
//! - crates/notenest_core/src/db/migrations/0002_notes.sql

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned note identifier (`notes.id`).
pub type NoteId = i64;

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Optional body text; `None` maps to SQL `NULL`.
    pub content: Option<String>,
}

impl Note {
    /// Returns the content, treating `NULL` as an empty body.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Validation errors raised before any SQL mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// Checks the write-time title invariant.
pub fn validate_title(title: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    Ok(())
}
