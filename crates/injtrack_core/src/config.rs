//! Application naming and persistence key configuration.
//!
//! # Responsibility
//! - Derive the key/value store keys used for the aggregate and theme.
//! - Derive backup file names.
//!
//! # Invariants
//! - `data_key()` is always `"<app_name>Data"`.
//! - Backup file names embed an ISO `YYYY-MM-DD` date.

use chrono::NaiveDate;

pub const DEFAULT_APP_NAME: &str = "injectionTracker";
pub const DEFAULT_BACKUP_PREFIX: &str = "injection-tracker";
pub const THEME_KEY: &str = "theme";

/// Naming configuration shared by repositories and the backup codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Application name used to namespace the aggregate key.
    pub app_name: String,
    /// Prefix for exported backup file names.
    pub backup_prefix: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            backup_prefix: DEFAULT_BACKUP_PREFIX.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Key under which the whole aggregate is persisted.
    pub fn data_key(&self) -> String {
        format!("{}Data", self.app_name)
    }

    /// Key under which the theme flag is persisted.
    pub fn theme_key(&self) -> &'static str {
        THEME_KEY
    }

    /// Returns `<prefix>-backup-<YYYY-MM-DD>.json`.
    pub fn backup_file_name(&self, date: NaiveDate) -> String {
        format!("{}-backup-{}.json", self.backup_prefix, date.format("%Y-%m-%d"))
    }
}
