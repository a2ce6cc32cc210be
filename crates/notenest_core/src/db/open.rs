//! Connection lifecycle for the notes database.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Prepare the schema before returning a usable connection.
//! - Close connections and surface close failures.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections are at `migrations::latest_version()`.

use super::migrations::{latest_version, prepare_schema, SchemaOutcome};
use super::{DbResult, SchemaPolicy};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a database file using `SchemaPolicy::Reset`.
///
/// # Side effects
/// - A stored schema version other than the current one wipes all notes.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_policy(path, SchemaPolicy::Reset)
}

/// Opens (or creates) a database file using the given schema policy.
pub fn open_db_with_policy(path: impl AsRef<Path>, policy: SchemaPolicy) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode=file policy={}",
        policy.as_str()
    );
    bootstrap("file", Connection::open(path), policy, started_at)
}

/// Opens a fresh in-memory database with the current schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");
    bootstrap(
        "memory",
        Connection::open_in_memory(),
        SchemaPolicy::Reset,
        started_at,
    )
}

/// Closes a connection opened by `open_*`.
///
/// Outstanding statements are finalized by rusqlite before the handle is
/// released.
pub fn close_db(conn: Connection) -> DbResult<()> {
    match conn.close() {
        Ok(()) => {
            info!("event=db_close module=db status=ok");
            Ok(())
        }
        Err((_conn, err)) => {
            error!(
                "event=db_close module=db status=error error_code=db_close_failed error={}",
                err
            );
            Err(err.into())
        }
    }
}

fn bootstrap(
    mode: &'static str,
    opened: rusqlite::Result<Connection>,
    policy: SchemaPolicy,
    started_at: Instant,
) -> DbResult<Connection> {
    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match configure_connection(&mut conn, policy) {
        Ok(outcome) => {
            log_schema_outcome(outcome);
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={} schema_version={}",
                mode,
                started_at.elapsed().as_millis(),
                latest_version()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn configure_connection(conn: &mut Connection, policy: SchemaPolicy) -> DbResult<SchemaOutcome> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    prepare_schema(conn, policy)
}

fn log_schema_outcome(outcome: SchemaOutcome) {
    match outcome {
        SchemaOutcome::Current => {}
        SchemaOutcome::Created => {
            info!("event=schema_create module=db status=ok version={}", latest_version());
        }
        SchemaOutcome::Migrated { from, to } => {
            info!("event=schema_migrate module=db status=ok from_version={from} to_version={to}");
        }
        SchemaOutcome::Reset { from, to } => {
            warn!(
                "event=schema_reset module=db status=ok from_version={from} to_version={to} data_loss=true"
            );
        }
    }
}
