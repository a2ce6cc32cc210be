use notenest_core::db::migrations::{latest_version, stored_version};
use notenest_core::db::{close_db, open_db, open_db_in_memory, open_db_with_policy, DbError};
use notenest_core::{NoteRepository, SchemaPolicy, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_notes_table_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "notes");
    assert_eq!(stored_version(&conn).unwrap(), latest_version());
}

#[test]
fn opening_same_database_twice_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let conn_first = open_db(&path).unwrap();
    SqliteNoteRepository::try_new(&conn_first)
        .unwrap()
        .create_note("Groceries", Some("Milk, eggs"))
        .unwrap();
    close_db(conn_first).unwrap();

    let conn_second = open_db(&path).unwrap();
    let repo = SqliteNoteRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.count_notes().unwrap(), 1);
    assert_eq!(schema_version(&conn_second), latest_version());
}

#[test]
fn existing_mobile_app_database_keeps_rows_under_both_policies() {
    let dir = tempfile::tempdir().unwrap();
    for policy in [SchemaPolicy::Reset, SchemaPolicy::Migrate] {
        let path = dir.path().join(format!("{}.db", policy.as_str()));
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE android_metadata (locale TEXT);
            INSERT INTO android_metadata VALUES ('en_US');
            CREATE TABLE notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT
            );
            INSERT INTO notes (title, content) VALUES ('Groceries', 'Milk, eggs');
            PRAGMA user_version = 2;",
        )
        .unwrap();
        drop(conn);

        let conn = open_db_with_policy(&path, policy).unwrap();
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        let notes = repo.list_notes().unwrap();
        assert_eq!(notes.len(), 1, "rows lost under {policy:?}");
        assert_eq!(notes[0].title, "Groceries");
        assert_eq!(schema_version(&conn), 2);
    }
}

#[test]
fn reset_policy_drops_rows_on_version_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.db");
    seed_note_file(&path, latest_version() + 1);

    let conn = open_db(&path).unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_notes().unwrap(), 0);
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn reset_policy_restarts_id_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.db");
    seed_note_file(&path, latest_version() + 1);

    let conn = open_db(&path).unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    assert_eq!(repo.create_note("fresh", None).unwrap(), 1);
}

#[test]
fn reset_policy_wipes_unversioned_legacy_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    seed_note_file(&path, 0);

    let conn = open_db_with_policy(&path, SchemaPolicy::Reset).unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    assert!(repo.list_notes().unwrap().is_empty());
}

#[test]
fn migrate_policy_keeps_rows_of_unversioned_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    seed_note_file(&path, 0);

    let conn = open_db_with_policy(&path, SchemaPolicy::Migrate).unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let notes = repo.list_notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "kept?");
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn migrate_policy_rejects_newer_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    seed_note_file(&path, 999);

    let err = open_db_with_policy(&path, SchemaPolicy::Migrate).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_table_with_current_version_is_recreated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_table_exists(&conn, "notes");
}

fn seed_note_file(path: &std::path::Path, version: u32) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT
        );
        INSERT INTO notes (title, content) VALUES ('kept?', 'maybe');
        INSERT INTO notes (title, content) VALUES ('second', NULL);
        DELETE FROM notes WHERE title = 'second';
        PRAGMA user_version = {version};"
    ))
    .unwrap();
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
