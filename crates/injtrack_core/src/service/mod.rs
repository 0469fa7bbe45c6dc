//! Pure use-case views and codecs over the aggregate.
//!
//! # Responsibility
//! - Derive read models (history feed, rotation, dashboard, chart series).
//! - Encode/decode backup documents and estimate daily calories.
//!
//! # Invariants
//! - Nothing here performs store I/O or mutates the aggregate.

pub mod backup;
pub mod calories;
pub mod dashboard;
pub mod history;
pub mod rotation;
pub mod stats;
