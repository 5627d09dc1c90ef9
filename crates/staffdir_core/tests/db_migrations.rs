use rusqlite::Connection;
use staffdir_core::db::migrations::latest_version;
use staffdir_core::db::{open_db, DbError};
use tempfile::TempDir;

fn db_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("staffdir.db")
}

#[test]
fn open_db_applies_all_migrations() {
    let dir = TempDir::new().unwrap();
    let conn = open_db(db_path(&dir)).unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    for table in ["employees", "departments", "activity_log"] {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1, "missing table {table}");
    }
}

#[test]
fn open_db_is_idempotent_for_migrated_files() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn open_db_refuses_newer_schema() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 99,
            ..
        }
    ));
}

#[test]
fn open_db_enforces_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let conn = open_db(db_path(&dir)).unwrap();

    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}
