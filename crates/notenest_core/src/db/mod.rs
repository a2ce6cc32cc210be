//! SQLite storage bootstrap and schema version handling.
//!
//! # Responsibility
//! - Open, configure and close the single SQLite connection used by the store.
//! - Bring the `notes` schema to the version this binary expects.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Callers must not read/write notes before `open_*` returns successfully.
//! - Under `SchemaPolicy::Reset`, any version mismatch is destructive.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{close_db, open_db, open_db_in_memory, open_db_with_policy};

/// Default database file name used by callers that do not pick one.
pub const DEFAULT_DB_FILE_NAME: &str = "notes.db";

pub type DbResult<T> = Result<T, DbError>;

/// How `open_*` reacts when the stored schema version differs from
/// `migrations::latest_version()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Drop the `notes` table and recreate it. All rows are lost.
    #[default]
    Reset,
    /// Apply pending registered migrations in order, keeping rows.
    Migrate,
}

impl SchemaPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Migrate => "migrate",
        }
    }
}

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
