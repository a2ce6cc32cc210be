//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete over the `notes` table.
//! - Keep SQL details inside the core persistence boundary.
//! - Translate engine failures into per-operation error kinds.
//!
//! # Invariants
//! - Write paths call `validate_title()` before SQL mutations.
//! - Lists are ordered by `id ASC`.
//! - "Not found" on update/delete is a zero count, never an error.
//! - Statements and cursors are scoped to the call that created them.

use crate::db::migrations::NOTES_TABLE;
use crate::db::DbError;
use crate::model::note::{validate_title, Note, NoteId, NoteValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content
FROM notes";

const REQUIRED_COLUMNS: [&str; 3] = ["id", "title", "content"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error taxonomy.
#[derive(Debug)]
pub enum RepoError {
    /// Caller input broke a field invariant; nothing was written.
    ValidationFailed(NoteValidationError),
    /// The insert statement failed.
    InsertFailed(DbError),
    /// A read (get/list/count) failed.
    QueryFailed(DbError),
    /// The update statement failed.
    UpdateFailed(DbError),
    /// The delete statement failed.
    DeleteFailed(DbError),
    /// Stored data cannot be represented by the model.
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed(err) => write!(f, "validation failed: {err}"),
            Self::InsertFailed(err) => write!(f, "failed to insert note: {err}"),
            Self::QueryFailed(err) => write!(f, "failed to query notes: {err}"),
            Self::UpdateFailed(err) => write!(f, "failed to update note: {err}"),
            Self::DeleteFailed(err) => write!(f, "failed to delete note: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; open the database first")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ValidationFailed(err) => Some(err),
            Self::InsertFailed(err)
            | Self::QueryFailed(err)
            | Self::UpdateFailed(err)
            | Self::DeleteFailed(err) => Some(err),
            Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::ValidationFailed(value)
    }
}

impl RepoError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "validation_failed",
            Self::InsertFailed(_) => "insert_failed",
            Self::QueryFailed(_) => "query_failed",
            Self::UpdateFailed(_) => "update_failed",
            Self::DeleteFailed(_) => "delete_failed",
            Self::InvalidData(_) => "invalid_data",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
        }
    }
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Inserts one note and returns the storage-assigned id.
    fn create_note(&self, title: &str, content: Option<&str>) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists every note in ascending id order.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Replaces title and content; returns affected rows (0 or 1).
    fn update_note(&self, id: NoteId, title: &str, content: Option<&str>) -> RepoResult<usize>;
    /// Hard-deletes one note; returns affected rows (0 or 1).
    fn delete_note(&self, id: NoteId) -> RepoResult<usize>;
    /// Returns the number of stored notes.
    fn count_notes(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository borrowing a caller-owned connection.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from an opened connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the connection
    ///   did not come from `db::open_*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, title: &str, content: Option<&str>) -> RepoResult<NoteId> {
        validate_title(title)?;

        self.conn
            .execute(
                "INSERT INTO notes (title, content) VALUES (?1, ?2);",
                params![title, content],
            )
            .map_err(|err| RepoError::InsertFailed(err.into()))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_note_row,
            )
            .optional()
            .map_err(query_failed)
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))
            .map_err(query_failed)?;
        let mut rows = stmt.query([]).map_err(query_failed)?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next().map_err(query_failed)? {
            notes.push(parse_note_row(row).map_err(query_failed)?);
        }

        Ok(notes)
    }

    fn update_note(&self, id: NoteId, title: &str, content: Option<&str>) -> RepoResult<usize> {
        validate_title(title)?;

        self.conn
            .execute(
                "UPDATE notes
                 SET
                    title = ?2,
                    content = ?3
                 WHERE id = ?1;",
                params![id, title, content],
            )
            .map_err(|err| RepoError::UpdateFailed(err.into()))
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<usize> {
        self.conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])
            .map_err(|err| RepoError::DeleteFailed(err.into()))
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
            .map_err(query_failed)?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
    })
}

fn query_failed(err: rusqlite::Error) -> RepoError {
    RepoError::QueryFailed(err.into())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, NOTES_TABLE)? {
        return Err(RepoError::MissingRequiredTable(NOTES_TABLE));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, NOTES_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: NOTES_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )
        .map_err(query_failed)?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .map_err(query_failed)?;
    let mut rows = stmt.query([]).map_err(query_failed)?;
    while let Some(row) = rows.next().map_err(query_failed)? {
        let current: String = row.get(1).map_err(query_failed)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{NoteRepository, RepoError, SqliteNoteRepository};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn try_new_rejects_unprepared_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
        assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
    }

    #[test]
    fn try_new_rejects_table_without_content_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, title TEXT NOT NULL);")
            .unwrap();
        let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
        assert!(matches!(
            err,
            RepoError::MissingRequiredColumn {
                table: "notes",
                column: "content"
            }
        ));
    }

    #[test]
    fn create_stores_null_content_when_absent() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();

        let id = repo.create_note("untitled body", None).unwrap();
        let loaded = repo.get_note(id).unwrap().unwrap();
        assert_eq!(loaded.content, None);
    }

    #[test]
    fn insert_failure_maps_to_insert_failed() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        conn.execute_batch("PRAGMA query_only = ON;").unwrap();

        let err = repo.create_note("blocked", Some("write")).unwrap_err();
        assert!(matches!(err, RepoError::InsertFailed(_)));
        assert_eq!(err.code(), "insert_failed");
    }

    #[test]
    fn update_failure_maps_to_update_failed() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        let id = repo.create_note("draft", Some("body")).unwrap();
        conn.execute_batch("PRAGMA query_only = ON;").unwrap();

        let err = repo.update_note(id, "final", Some("body")).unwrap_err();
        assert!(matches!(err, RepoError::UpdateFailed(_)));
        assert_eq!(err.code(), "update_failed");
    }

    #[test]
    fn delete_failure_maps_to_delete_failed() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        let id = repo.create_note("doomed", None).unwrap();
        conn.execute_batch("PRAGMA query_only = ON;").unwrap();

        let err = repo.delete_note(id).unwrap_err();
        assert!(matches!(err, RepoError::DeleteFailed(_)));
        assert_eq!(err.code(), "delete_failed");
        assert_eq!(repo.count_notes().unwrap(), 1);
    }
}
