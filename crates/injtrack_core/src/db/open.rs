//! Connection bootstrap for the tracker data file.
//!
//! # Invariants
//! - Returned connections have every migration applied.
//! - A missing parent directory is created before SQLite opens the file.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when absent) the tracker data file at `path`.
///
/// # Errors
/// - `CreateDir` when the parent directory cannot be created.
/// - `SchemaTooNew` when the file was migrated by a newer build.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    open_with("file", || Connection::open(path))
}

/// Opens a throwaway in-memory database with the same schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = connect().map_err(DbError::from).and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let applied = apply_migrations(&mut conn)?;
        Ok((conn, applied))
    });

    match result {
        Ok((conn, applied)) => {
            info!(
                "event=db_open module=db status=ok mode={mode} migrations_applied={applied} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}
