//! Repositories over the key/value store.
//!
//! # Responsibility
//! - Hold the current aggregate and theme, and persist every change.
//! - Map store, backup and calorie failures into one error type.
//!
//! # Invariants
//! - Unknown ids on update/delete are not errors.
//! - Every error leaves the published state unchanged.

use crate::service::backup::BackupError;
use crate::service::calories::CalorieError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod theme_repo;
pub mod tracker_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    Backup(BackupError),
    Calories(CalorieError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Backup(err) => write!(f, "{err}"),
            Self::Calories(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Backup(err) => Some(err),
            Self::Calories(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<BackupError> for RepoError {
    fn from(value: BackupError) -> Self {
        Self::Backup(value)
    }
}

impl From<CalorieError> for RepoError {
    fn from(value: CalorieError) -> Self {
        Self::Calories(value)
    }
}
