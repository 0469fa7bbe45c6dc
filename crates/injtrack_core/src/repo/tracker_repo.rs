//! Record repository over the persisted aggregate.
//!
//! # Responsibility
//! - Own the current aggregate and expose CRUD over its four collections.
//! - Persist the whole aggregate with one store call per mutation.
//! - Replace the aggregate wholesale on reset and import.
//!
//! # Invariants
//! - Published snapshots are immutable; a mutation builds a new aggregate
//!   from a deep copy and publishes it as a new `Arc` only after the store
//!   write succeeds. A failed write leaves the published snapshot as it was.
//! - `update_*`/`delete_*` for an unknown id are no-ops: nothing is written
//!   and the current snapshot is returned unchanged.
//! - `reset_all` and `import_document` always publish a freshly allocated
//!   snapshot, even when it is value-equal to the previous one.
//! - Inputs are trusted; field validation belongs to callers.

use crate::config::TrackerConfig;
use crate::model::data::TrackerData;
use crate::model::profile::UserProfile;
use crate::model::record::{
    new_record_id, Injection, Measurement, NewInjection, NewMeasurement, NewSideEffect,
    NewWeightEntry, Record, RecordId, RecordKind, SideEffect, WeightEntry,
};
use crate::repo::{RepoError, RepoResult};
use crate::service::backup;
use crate::service::calories::{estimate_daily_calories, ActivityLevel};
use crate::store::{load_or_default, save_value, KvStore};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;

/// Repository holding the current aggregate snapshot.
///
/// Mutators take `&mut self`; that exclusive borrow is the boundary around
/// read-current, compute-next, publish-next. Callers sharing a repository
/// across threads wrap it in one `Mutex`.
pub struct TrackerRepository<S: KvStore> {
    store: S,
    data_key: String,
    current: Arc<TrackerData>,
}

impl<S: KvStore> TrackerRepository<S> {
    /// Loads the aggregate from `store`, falling back to a fresh default when
    /// the key is absent or its value is malformed.
    ///
    /// # Errors
    /// - Returns `RepoError::Store` when the store itself cannot be read.
    pub fn open(store: S, config: &TrackerConfig) -> RepoResult<Self> {
        let data_key = config.data_key();
        let data = load_or_default(&store, &data_key, TrackerData::default)?;
        info!(
            "event=repo_open module=repo status=ok records={}",
            data.record_count()
        );
        Ok(Self {
            store,
            data_key,
            current: Arc::new(data),
        })
    }

    /// Current snapshot. Later mutations never alter a returned snapshot.
    pub fn snapshot(&self) -> Arc<TrackerData> {
        Arc::clone(&self.current)
    }

    pub fn data(&self) -> &TrackerData {
        &self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add_injection(&mut self, fields: NewInjection) -> RepoResult<RecordId> {
        let id = new_record_id();
        let record = fields.into_record(id.clone());
        self.commit("add_injection", |data| {
            data.injections.push(record);
            true
        })?;
        Ok(id)
    }

    pub fn update_injection(&mut self, record: Injection) -> RepoResult<Arc<TrackerData>> {
        self.commit("update_injection", |data| {
            replace_record(&mut data.injections, record)
        })
    }

    pub fn delete_injection(&mut self, id: &str) -> RepoResult<Arc<TrackerData>> {
        self.commit("delete_injection", |data| {
            remove_record(&mut data.injections, id)
        })
    }

    pub fn add_weight(&mut self, fields: NewWeightEntry) -> RepoResult<RecordId> {
        let id = new_record_id();
        let record = fields.into_record(id.clone());
        self.commit("add_weight", |data| {
            data.weights.push(record);
            true
        })?;
        Ok(id)
    }

    pub fn update_weight(&mut self, record: WeightEntry) -> RepoResult<Arc<TrackerData>> {
        self.commit("update_weight", |data| {
            replace_record(&mut data.weights, record)
        })
    }

    pub fn delete_weight(&mut self, id: &str) -> RepoResult<Arc<TrackerData>> {
        self.commit("delete_weight", |data| remove_record(&mut data.weights, id))
    }

    pub fn add_side_effect(&mut self, fields: NewSideEffect) -> RepoResult<RecordId> {
        let id = new_record_id();
        let record = fields.into_record(id.clone());
        self.commit("add_side_effect", |data| {
            data.side_effects.push(record);
            true
        })?;
        Ok(id)
    }

    pub fn update_side_effect(&mut self, record: SideEffect) -> RepoResult<Arc<TrackerData>> {
        self.commit("update_side_effect", |data| {
            replace_record(&mut data.side_effects, record)
        })
    }

    pub fn delete_side_effect(&mut self, id: &str) -> RepoResult<Arc<TrackerData>> {
        self.commit("delete_side_effect", |data| {
            remove_record(&mut data.side_effects, id)
        })
    }

    pub fn add_measurement(&mut self, fields: NewMeasurement) -> RepoResult<RecordId> {
        let id = new_record_id();
        let record = fields.into_record(id.clone());
        self.commit("add_measurement", |data| {
            data.measurements.push(record);
            true
        })?;
        Ok(id)
    }

    pub fn update_measurement(&mut self, record: Measurement) -> RepoResult<Arc<TrackerData>> {
        self.commit("update_measurement", |data| {
            replace_record(&mut data.measurements, record)
        })
    }

    pub fn delete_measurement(&mut self, id: &str) -> RepoResult<Arc<TrackerData>> {
        self.commit("delete_measurement", |data| {
            remove_record(&mut data.measurements, id)
        })
    }

    /// Deletes by collection tag, as surfaced by the history feed.
    pub fn delete_record(&mut self, kind: RecordKind, id: &str) -> RepoResult<Arc<TrackerData>> {
        match kind {
            RecordKind::Injection => self.delete_injection(id),
            RecordKind::Weight => self.delete_weight(id),
            RecordKind::SideEffect => self.delete_side_effect(id),
            RecordKind::Measurement => self.delete_measurement(id),
        }
    }

    /// Replaces the singleton profile wholesale.
    pub fn set_profile(&mut self, profile: UserProfile) -> RepoResult<Arc<TrackerData>> {
        self.commit("set_profile", |data| {
            data.profile = profile;
            true
        })
    }

    /// Computes the daily calorie estimate and stores it on the profile.
    ///
    /// # Errors
    /// - `RepoError::Calories` when gender, weight, height or age is missing;
    ///   the aggregate is left unchanged.
    pub fn apply_daily_calories(&mut self, activity: ActivityLevel) -> RepoResult<u32> {
        let calories =
            estimate_daily_calories(&self.current.profile, &self.current.weights, activity)?;
        self.commit("apply_daily_calories", |data| {
            data.profile.daily_calories = Some(calories);
            true
        })?;
        Ok(calories)
    }

    /// Replaces the aggregate with a fresh default instance.
    pub fn reset_all(&mut self) -> RepoResult<Arc<TrackerData>> {
        self.publish("reset_all", TrackerData::default())
    }

    /// Encodes the current aggregate as a backup document.
    pub fn export_document(&self) -> RepoResult<String> {
        Ok(backup::export_document(&self.current)?)
    }

    /// Validates `text` as a backup document and, on success, replaces the
    /// whole aggregate with it. On failure nothing changes.
    pub fn import_document(&mut self, text: &str) -> RepoResult<Arc<TrackerData>> {
        let data = backup::import_document(text).map_err(|err| {
            error!("event=repo_import module=repo status=error error={err}");
            err
        })?;
        self.publish("import", data)
    }

    fn commit(
        &mut self,
        op: &'static str,
        mutate: impl FnOnce(&mut TrackerData) -> bool,
    ) -> RepoResult<Arc<TrackerData>> {
        let mut next = TrackerData::clone(&self.current);
        if !mutate(&mut next) {
            debug!("event=repo_commit module=repo status=noop op={op} reason=not_found");
            return Ok(self.snapshot());
        }
        self.publish(op, next)
    }

    fn publish(&mut self, op: &'static str, next: TrackerData) -> RepoResult<Arc<TrackerData>> {
        let started_at = Instant::now();
        if let Err(err) = save_value(&self.store, &self.data_key, &next) {
            error!(
                "event=repo_commit module=repo status=error op={op} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(RepoError::Store(err));
        }

        self.current = Arc::new(next);
        info!(
            "event=repo_commit module=repo status=ok op={op} records={} duration_ms={}",
            self.current.record_count(),
            started_at.elapsed().as_millis()
        );
        Ok(self.snapshot())
    }
}

fn replace_record<T: Record>(records: &mut [T], record: T) -> bool {
    match records.iter_mut().find(|existing| existing.id() == record.id()) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

fn remove_record<T: Record>(records: &mut Vec<T>, id: &str) -> bool {
    let before = records.len();
    records.retain(|record| record.id() != id);
    records.len() != before
}
