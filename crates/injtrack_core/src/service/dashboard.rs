//! At-a-glance summary derived from the aggregate.

use crate::model::data::TrackerData;
use crate::model::record::{Injection, Record, WeightEntry};
use crate::model::site::InjectionSite;
use crate::service::rotation::next_site;
use chrono::{Days, NaiveDate};

/// Days between scheduled injections.
pub const INJECTION_INTERVAL_DAYS: u64 = 7;

/// Latest record by date; among equal dates the first in stored order wins.
pub fn latest_by_date<T: Record>(records: &[T]) -> Option<&T> {
    records.iter().rev().max_by_key(|record| record.date())
}

pub fn last_injection(data: &TrackerData) -> Option<&Injection> {
    latest_by_date(&data.injections)
}

pub fn current_weight(data: &TrackerData) -> Option<&WeightEntry> {
    latest_by_date(&data.weights)
}

/// Absolute number of whole days between `date` and `today`.
pub fn days_since(date: NaiveDate, today: NaiveDate) -> u64 {
    today.signed_duration_since(date).num_days().unsigned_abs()
}

/// Date the next injection is due after `last`.
pub fn next_injection_due(last: &Injection) -> Option<NaiveDate> {
    last.date.checked_add_days(Days::new(INJECTION_INTERVAL_DAYS))
}

/// Site recommended for the next injection under the profile's rotation.
pub fn recommended_site(data: &TrackerData) -> Option<InjectionSite> {
    next_site(last_injection(data), &data.profile.rotation_sites)
}

/// Snapshot of the home-screen figures.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub last_injection: Option<Injection>,
    pub days_since_last_injection: Option<u64>,
    pub next_injection_due: Option<NaiveDate>,
    pub current_weight: Option<f64>,
    pub recommended_site: Option<InjectionSite>,
}

pub fn summarize(data: &TrackerData, today: NaiveDate) -> DashboardSummary {
    let last = last_injection(data);
    DashboardSummary {
        last_injection: last.cloned(),
        days_since_last_injection: last.map(|injection| days_since(injection.date, today)),
        next_injection_due: last.and_then(next_injection_due),
        current_weight: current_weight(data).map(|entry| entry.weight),
        recommended_site: recommended_site(data),
    }
}
