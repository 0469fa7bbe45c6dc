//! Domain model for tracked health records.
//!
//! # Responsibility
//! - Define the record kinds, the singleton profile and the aggregate.
//! - Keep wire names stable for persisted data and backup documents.
//!
//! # Invariants
//! - Records are identified by an id unique within their collection.
//! - The aggregate is a plain value; mutation produces a new value.

pub mod data;
pub(crate) mod number;
pub mod profile;
pub mod record;
pub mod site;
pub mod theme;
