//! Injection site rotation planner.
//!
//! # Invariants
//! - Pure: identical inputs always yield the same site.
//! - An empty configured rotation means all four sites in canonical order.
//! - A last site missing from the active rotation restarts at its head.

use crate::model::record::Injection;
use crate::model::site::InjectionSite;

/// Recommends the site to use after `last_injection`.
///
/// Returns `None` only when the effective rotation is empty, which cannot
/// happen given the canonical fallback.
pub fn next_site(
    last_injection: Option<&Injection>,
    rotation_sites: &[InjectionSite],
) -> Option<InjectionSite> {
    let rotation: &[InjectionSite] = if rotation_sites.is_empty() {
        &InjectionSite::ALL
    } else {
        rotation_sites
    };

    let first = *rotation.first()?;
    let Some(last) = last_injection else {
        return Some(first);
    };

    match rotation.iter().position(|site| *site == last.site) {
        Some(index) => Some(rotation[(index + 1) % rotation.len()]),
        None => Some(first),
    }
}
