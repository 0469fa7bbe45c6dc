//! Core domain logic for injtrack, a personal injection/weight tracker.
//! This crate is the single source of truth for tracked records and their
//! invariants: repository CRUD, site rotation, history and backups.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::TrackerConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::data::TrackerData;
pub use model::profile::{Gender, UserProfile};
pub use model::record::{
    Injection, Measurement, NewInjection, NewMeasurement, NewSideEffect, NewWeightEntry, Record,
    RecordId, RecordKind, RecordValidationError, SideEffect, WeightEntry,
};
pub use model::site::{default_site_labels, site_label, InjectionSite, SiteLabels, DEFAULT_DOSES};
pub use model::theme::Theme;
pub use repo::theme_repo::ThemeRepository;
pub use repo::tracker_repo::TrackerRepository;
pub use repo::{RepoError, RepoResult};
pub use service::backup::{export_document, import_document, BackupError};
pub use service::calories::{estimate_daily_calories, ActivityLevel, CalorieError, CalorieInput};
pub use service::history::{aggregate_history, HistoryEntry};
pub use service::rotation::next_site;
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for front ends.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
