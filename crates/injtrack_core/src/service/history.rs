//! Combined, date-ordered feed over all four record collections.
//!
//! # Invariants
//! - Entries borrow their records; the collections are never modified.
//! - Ordered by date, newest first. Same-date entries keep concatenation
//!   order (injections, weights, side effects, measurements, each in stored
//!   order); callers must not rely on that sub-order.

use crate::model::record::{Injection, Measurement, Record, RecordKind, SideEffect, WeightEntry};
use chrono::NaiveDate;

/// One record tagged with its collection of origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HistoryEntry<'a> {
    Injection(&'a Injection),
    Weight(&'a WeightEntry),
    SideEffect(&'a SideEffect),
    Measurement(&'a Measurement),
}

impl HistoryEntry<'_> {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Injection(_) => RecordKind::Injection,
            Self::Weight(_) => RecordKind::Weight,
            Self::SideEffect(_) => RecordKind::SideEffect,
            Self::Measurement(_) => RecordKind::Measurement,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Injection(record) => record.id(),
            Self::Weight(record) => record.id(),
            Self::SideEffect(record) => record.id(),
            Self::Measurement(record) => record.id(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Injection(record) => record.date(),
            Self::Weight(record) => record.date(),
            Self::SideEffect(record) => record.date(),
            Self::Measurement(record) => record.date(),
        }
    }
}

/// Merges the four collections into one feed, newest first.
pub fn aggregate_history<'a>(
    injections: &'a [Injection],
    weights: &'a [WeightEntry],
    side_effects: &'a [SideEffect],
    measurements: &'a [Measurement],
) -> Vec<HistoryEntry<'a>> {
    let mut entries: Vec<HistoryEntry<'a>> = injections
        .iter()
        .map(HistoryEntry::Injection)
        .chain(weights.iter().map(HistoryEntry::Weight))
        .chain(side_effects.iter().map(HistoryEntry::SideEffect))
        .chain(measurements.iter().map(HistoryEntry::Measurement))
        .collect();

    entries.sort_by(|left, right| right.date().cmp(&left.date()));
    entries
}
