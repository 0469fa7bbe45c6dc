use chrono::NaiveDate;
use injtrack_core::db::migrations::latest_version;
use injtrack_core::db::{open_db, open_db_in_memory, DbError};
use injtrack_core::{
    InjectionSite, KvStore, NewInjection, SqliteKvStore, Theme, ThemeRepository, TrackerConfig,
    TrackerRepository,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("injtrack.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_entries");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("injtrack.db");

    let conn = open_db(&path).unwrap();
    assert!(path.exists());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn sqlite_store_overwrites_values_per_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    assert_eq!(store.load_raw("theme").unwrap(), None);
    store.save_raw("theme", "\"light\"").unwrap();
    store.save_raw("theme", "\"dark\"").unwrap();

    assert_eq!(store.load_raw("theme").unwrap().as_deref(), Some("\"dark\""));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn aggregate_and_theme_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("injtrack.db");
    let config = TrackerConfig::default();

    let id = {
        let conn = open_db(&path).unwrap();
        let mut repo = TrackerRepository::open(SqliteKvStore::new(&conn), &config).unwrap();
        let mut theme = ThemeRepository::open(SqliteKvStore::new(&conn), &config).unwrap();
        theme.set_theme(Theme::Dark).unwrap();
        repo.add_injection(NewInjection {
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            dose: 1.5,
            site: InjectionSite::ArmRight,
            comment: None,
        })
        .unwrap()
    };

    let conn = open_db(&path).unwrap();
    let repo = TrackerRepository::open(SqliteKvStore::new(&conn), &config).unwrap();
    let theme = ThemeRepository::open(SqliteKvStore::new(&conn), &config).unwrap();

    assert_eq!(repo.data().injections.len(), 1);
    assert_eq!(repo.data().injections[0].id, id);
    assert_eq!(theme.theme(), Theme::Dark);
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
