//! Chart-ready series. Rendering happens elsewhere.

use crate::model::record::{Injection, SideEffect, WeightEntry};
use crate::model::site::InjectionSite;
use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeMap;

/// Dated value, oldest first when part of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

pub fn weight_series(weights: &[WeightEntry]) -> Vec<SeriesPoint> {
    ascending(weights.iter().map(|entry| SeriesPoint {
        date: entry.date,
        value: entry.weight,
    }))
}

pub fn dose_series(injections: &[Injection]) -> Vec<SeriesPoint> {
    ascending(injections.iter().map(|injection| SeriesPoint {
        date: injection.date,
        value: injection.dose,
    }))
}

/// Sunday that starts the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Side-effect counts per week (keyed by the week's Sunday), oldest first.
pub fn weekly_side_effect_counts(side_effects: &[SideEffect]) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for effect in side_effects {
        *counts.entry(week_start(effect.date)).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Injection count for each of the four sites, in canonical order.
pub fn site_usage(injections: &[Injection]) -> Vec<(InjectionSite, usize)> {
    InjectionSite::ALL
        .into_iter()
        .map(|site| {
            let count = injections
                .iter()
                .filter(|injection| injection.site == site)
                .count();
            (site, count)
        })
        .collect()
}

fn ascending(points: impl Iterator<Item = SeriesPoint>) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = points.collect();
    points.sort_by_key(|point| point.date);
    points
}
