//! Schema version registry and executor.
//!
//! # Responsibility
//! - Register schema steps in strictly increasing version order.
//! - Bring a connection to `latest_version()` under a `SchemaPolicy`.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - The applied version is mirrored to `PRAGMA user_version` in the same
//!   transaction as the DDL.
//! - A missing `notes` table counts as version 0 regardless of
//!   `user_version`.

use crate::db::{DbError, DbResult, SchemaPolicy};
use rusqlite::Connection;

/// Name of the single table owned by the store.
pub const NOTES_TABLE: &str = "notes";

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

// Numbering starts at 2: existing `notes.db` files were stamped
// `user_version = 2` by the mobile app's SQLiteOpenHelper.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    sql: include_str!("0002_notes.sql"),
}];

/// What `prepare_schema` did to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// Stored version already matched.
    Current,
    /// No `notes` table existed; schema was created from scratch.
    Created,
    /// Pending steps were applied on top of existing rows.
    Migrated { from: u32, to: u32 },
    /// The table was dropped and recreated; previous rows are gone.
    Reset { from: u32, to: u32 },
}

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Returns the effective stored schema version.
///
/// Reports `0` when the `notes` table does not exist, even if
/// `user_version` says otherwise.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    if !notes_table_exists(conn)? {
        return Ok(0);
    }
    current_user_version(conn)
}

/// Brings the schema to `latest_version()` following `policy`.
pub fn prepare_schema(conn: &mut Connection, policy: SchemaPolicy) -> DbResult<SchemaOutcome> {
    let table_present = notes_table_exists(conn)?;
    let stored = if table_present {
        current_user_version(conn)?
    } else {
        0
    };
    let latest = latest_version();

    if table_present && stored == latest {
        return Ok(SchemaOutcome::Current);
    }

    if !table_present {
        apply_from(conn, 0)?;
        return Ok(SchemaOutcome::Created);
    }

    match policy {
        SchemaPolicy::Reset => {
            reset_schema(conn)?;
            Ok(SchemaOutcome::Reset {
                from: stored,
                to: latest,
            })
        }
        SchemaPolicy::Migrate => {
            if stored > latest {
                return Err(DbError::UnsupportedSchemaVersion {
                    db_version: stored,
                    latest_supported: latest,
                });
            }
            apply_from(conn, stored)?;
            Ok(SchemaOutcome::Migrated {
                from: stored,
                to: latest,
            })
        }
    }
}

/// Drops the `notes` table and rebuilds it at `latest_version()`.
///
/// Every stored note is lost. The `AUTOINCREMENT` counter restarts as well.
pub fn reset_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(&format!("DROP TABLE IF EXISTS {NOTES_TABLE};"))?;
    for migration in MIGRATIONS {
        tx.execute_batch(migration.sql)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))?;
    tx.commit()?;
    Ok(())
}

fn apply_from(conn: &mut Connection, current_version: u32) -> DbResult<()> {
    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn notes_table_exists(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [NOTES_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
