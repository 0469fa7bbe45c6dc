//! Durable key/value persistence boundary.
//!
//! # Responsibility
//! - Define the `KvStore` contract consumed by repositories.
//! - Provide typed JSON load/save helpers with default fallback.
//!
//! # Invariants
//! - Values are stored as JSON text.
//! - Absent or malformed values fall back to the caller's default on load;
//!   backend failures are never masked.

use crate::db::DbError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Backend could not read or write.
    Backend(DbError),
    /// Value could not be encoded as JSON.
    Encode(serde_json::Error),
    /// Backend rejected a write for a reason other than SQLite.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(err) => write!(f, "store backend failure: {err}"),
            Self::Encode(err) => write!(f, "failed to encode stored value: {err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Backend(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Backend(DbError::Sqlite(value))
    }
}

/// String key to JSON text mapping that survives process restarts.
pub trait KvStore {
    fn load_raw(&self, key: &str) -> StoreResult<Option<String>>;
    fn save_raw(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn load_raw(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).save_raw(key, value)
    }
}

/// Loads and decodes `key`, falling back to `default()` when the value is
/// absent or cannot be decoded as `T`.
pub fn load_or_default<T, S, F>(store: &S, key: &str, default: F) -> StoreResult<T>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
    F: FnOnce() -> T,
{
    let Some(raw) = store.load_raw(key)? else {
        return Ok(default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(
                "event=store_load module=store status=fallback key={key} reason=malformed line={} column={}",
                err.line(),
                err.column()
            );
            Ok(default())
        }
    }
}

/// Encodes `value` as JSON and writes it under `key` in one store call.
pub fn save_value<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(StoreError::Encode)?;
    store.save_raw(key, &raw)
}
