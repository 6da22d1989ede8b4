//! Unit tests for the groupshelf database layer (connection + migrations).

use groupshelf::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use groupshelf::database::Database;
use tempfile::TempDir;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_kv_store_table() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for table in ["schema_version", "kv_store"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_reopen_does_not_rerun_migrations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");

    {
        let db = Database::open(&path).expect("first open failed");
        db.connection()
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES ('k', '1', 0)",
                [],
            )
            .unwrap();
    }

    let db = Database::open(&path).expect("second open failed");
    let versions: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(versions, 1, "each migration is recorded exactly once");

    let value: String = db
        .connection()
        .query_row("SELECT value FROM kv_store WHERE key = 'k'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(value, "1");
}

#[test]
fn test_kv_store_key_is_unique() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES ('dup', '1', 0)",
        [],
    )
    .unwrap();
    let second = conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES ('dup', '2', 0)",
        [],
    );
    assert!(second.is_err(), "duplicate keys must be rejected");
}
