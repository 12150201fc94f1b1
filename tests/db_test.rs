use papermind::db;
use papermind::papers::store::SqlitePaperStore;
use papermind::papers::KeyValueStore;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("papers.db");
    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();
    assert!(db_path.exists());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM papers", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn busy_timeout_is_set() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("test.db")).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);
}

#[test]
fn foreign_keys_are_enforced() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("test.db")).unwrap();
    let on: i64 = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .unwrap();
    assert_eq!(on, 1);

    let conn = db::open_memory_database().unwrap();
    let on: i64 = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .unwrap();
    assert_eq!(on, 1);
}

#[test]
fn papers_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("papers.db");

    {
        let conn = db::open_database(&db_path).unwrap();
        let store = SqlitePaperStore::new(Arc::new(Mutex::new(conn)));
        store.set("Deep Learning", "An introduction...").unwrap();
    }

    let conn = db::open_database(&db_path).unwrap();
    let store = SqlitePaperStore::new(Arc::new(Mutex::new(conn)));
    assert_eq!(
        store.get("Deep Learning").unwrap().as_deref(),
        Some("An introduction...")
    );
}

#[test]
fn health_check_counts_rows() {
    let conn = db::open_memory_database().unwrap();
    conn.execute(
        "INSERT INTO papers (title, summary, created_at, updated_at) VALUES ('t', 's', 'now', 'now')",
        [],
    )
    .unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
    assert_eq!(report.paper_count, 1);
    assert_eq!(report.memory_count, 0);
}
