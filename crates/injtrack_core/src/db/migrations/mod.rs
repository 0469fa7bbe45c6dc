//! Ordered schema migrations for the key/value table.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per entry.
//! - `PRAGMA user_version` mirrors the last applied version.
//! - Pending migrations run inside a single transaction.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::Connection;

/// `(version, sql)` pairs in application order.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to `latest_version()`; returns how many migrations ran.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<_> = MIGRATIONS
        .iter()
        .filter(|(version, _)| *version > found)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for (version, sql) in &pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        debug!("event=db_migrate module=db status=ok version={version}");
    }
    tx.commit()?;

    Ok(pending.len())
}
