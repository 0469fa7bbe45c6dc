//! Backup document codec.
//!
//! # Responsibility
//! - Serialize the aggregate into a portable, indented JSON document.
//! - Validate a document and decode it into a complete aggregate.
//! - Read and write backup files.
//!
//! # Invariants
//! - Import is all-or-nothing: any missing required key or malformed
//!   section fails the whole document.
//! - The imported profile is merged over `UserProfile::default()`.
//! - A `null` site-label dictionary is regenerated from the built-in labels;
//!   otherwise it is restored verbatim.
//! - Record ids are preserved, never regenerated.

use crate::config::TrackerConfig;
use crate::model::data::TrackerData;
use crate::model::profile::UserProfile;
use crate::model::record::{Record, RecordId, RecordKind};
use crate::model::site::{default_site_labels, SiteLabels};
use chrono::NaiveDate;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Top-level keys every backup document must carry.
pub const REQUIRED_KEYS: [&str; 6] = [
    "injections",
    "weights",
    "sideEffects",
    "measurements",
    "profile",
    "injectionSites",
];

#[derive(Debug)]
pub enum BackupError {
    /// Backup file could not be read or written.
    Io(std::io::Error),
    /// Document is not valid JSON.
    Parse(serde_json::Error),
    /// Document is valid JSON but not an object.
    NotAnObject,
    /// Required top-level key is absent.
    MissingKey(&'static str),
    /// A section does not match the expected record shape.
    InvalidSection {
        key: &'static str,
        source: serde_json::Error,
    },
    /// Two records in one collection share an id.
    DuplicateId { kind: RecordKind, id: RecordId },
    /// Aggregate could not be encoded.
    Encode(serde_json::Error),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "backup file i/o failed: {err}"),
            Self::Parse(err) => write!(f, "invalid backup format: not valid JSON ({err})"),
            Self::NotAnObject => write!(f, "invalid backup format: expected a JSON object"),
            Self::MissingKey(key) => write!(f, "invalid backup format: missing `{key}`"),
            Self::InvalidSection { key, source } => {
                write!(f, "invalid backup format: `{key}` is malformed ({source})")
            }
            Self::DuplicateId { kind, id } => {
                write!(f, "invalid backup format: duplicate {kind} id `{id}`")
            }
            Self::Encode(err) => write!(f, "failed to encode backup: {err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidSection { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::NotAnObject | Self::MissingKey(_) | Self::DuplicateId { .. } => None,
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl BackupError {
    /// Whether the failure is about the document content rather than I/O.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Encode(_))
    }
}

/// Encodes the aggregate as an indented JSON document.
pub fn export_document(data: &TrackerData) -> Result<String, BackupError> {
    serde_json::to_string_pretty(data).map_err(BackupError::Encode)
}

/// Validates and decodes a backup document into a complete aggregate.
///
/// # Errors
/// - `Parse`/`NotAnObject` when the text is not a JSON object.
/// - `MissingKey` when any of `REQUIRED_KEYS` is absent.
/// - `InvalidSection` when a section has the wrong shape (bad date, unknown
///   site, non-numeric dose, ...).
/// - `DuplicateId` when a collection repeats an id.
pub fn import_document(text: &str) -> Result<TrackerData, BackupError> {
    let value: Value = serde_json::from_str(text).map_err(BackupError::Parse)?;
    let Value::Object(mut document) = value else {
        return Err(BackupError::NotAnObject);
    };

    if let Some(missing) = REQUIRED_KEYS
        .iter()
        .find(|key| !document.contains_key(**key))
    {
        return Err(BackupError::MissingKey(*missing));
    }

    let data = TrackerData {
        injections: unique(take_section(&mut document, "injections")?)?,
        weights: unique(take_section(&mut document, "weights")?)?,
        side_effects: unique(take_section(&mut document, "sideEffects")?)?,
        measurements: unique(take_section(&mut document, "measurements")?)?,
        profile: take_section::<Option<UserProfile>>(&mut document, "profile")?
            .unwrap_or_default(),
        injection_sites: take_section::<Option<SiteLabels>>(&mut document, "injectionSites")?
            .unwrap_or_else(default_site_labels),
    };

    if !document.is_empty() {
        warn!(
            "event=backup_import module=backup status=ignored_keys count={}",
            document.len()
        );
    }

    Ok(data)
}

/// Reads backup text from a user-supplied file.
pub fn read_backup_file(path: impl AsRef<Path>) -> Result<String, BackupError> {
    Ok(std::fs::read_to_string(path)?)
}

/// Writes `data` to `<dir>/<prefix>-backup-<date>.json` and returns the path.
pub fn write_backup_file(
    dir: impl AsRef<Path>,
    config: &TrackerConfig,
    data: &TrackerData,
    date: NaiveDate,
) -> Result<PathBuf, BackupError> {
    let path = dir.as_ref().join(config.backup_file_name(date));
    let document = export_document(data)?;
    std::fs::write(&path, document)?;
    info!(
        "event=backup_export module=backup status=ok records={}",
        data.record_count()
    );
    Ok(path)
}

fn take_section<T: DeserializeOwned>(
    document: &mut Map<String, Value>,
    key: &'static str,
) -> Result<T, BackupError> {
    let value = document.remove(key).unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|source| BackupError::InvalidSection { key, source })
}

fn unique<T: Record>(records: Vec<T>) -> Result<Vec<T>, BackupError> {
    {
        let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
        for record in records.iter() {
            if !seen.insert(record.id()) {
                return Err(BackupError::DuplicateId {
                    kind: T::KIND,
                    id: record.id().to_string(),
                });
            }
        }
    }
    Ok(records)
}
