//! SQLite-backed key/value store.
//!
//! # Invariants
//! - One row per key in `kv_entries`; writes are single UPSERT statements.
//! - The connection must come from `db::open_db*` so migrations are applied.

use super::{KvStore, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};

/// `KvStore` over a migrated SQLite connection.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn load_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
