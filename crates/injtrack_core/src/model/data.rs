//! The aggregate of all tracked data.
//!
//! # Invariants
//! - Persisted and replaced as one unit; never partially written.
//! - Owns its collections outright, so a clone shares nothing mutable with
//!   the value it was cloned from.
//! - Decoding fills any missing top-level field from `TrackerData::default()`.

use super::profile::UserProfile;
use super::record::{Injection, Measurement, SideEffect, WeightEntry};
use super::site::{default_site_labels, SiteLabels};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerData {
    pub injections: Vec<Injection>,
    pub weights: Vec<WeightEntry>,
    pub side_effects: Vec<SideEffect>,
    pub measurements: Vec<Measurement>,
    pub profile: UserProfile,
    pub injection_sites: SiteLabels,
}

impl Default for TrackerData {
    fn default() -> Self {
        Self {
            injections: Vec::new(),
            weights: Vec::new(),
            side_effects: Vec::new(),
            measurements: Vec::new(),
            profile: UserProfile::default(),
            injection_sites: default_site_labels(),
        }
    }
}

impl TrackerData {
    /// Total number of dated records across the four collections.
    pub fn record_count(&self) -> usize {
        self.injections.len() + self.weights.len() + self.side_effects.len() + self.measurements.len()
    }

    /// Whether every collection is empty.
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}
