//! Injection site enum and its display labels.
//!
//! # Invariants
//! - Exactly four sites exist; their wire values are fixed.
//! - `InjectionSite::ALL` is the canonical rotation order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Anatomical location of an injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionSite {
    AbdomenLeft,
    AbdomenRight,
    ArmLeft,
    ArmRight,
}

impl InjectionSite {
    /// Canonical order, also the default rotation.
    pub const ALL: [InjectionSite; 4] = [
        InjectionSite::AbdomenLeft,
        InjectionSite::AbdomenRight,
        InjectionSite::ArmLeft,
        InjectionSite::ArmRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AbdomenLeft => "abdomen_left",
            Self::AbdomenRight => "abdomen_right",
            Self::ArmLeft => "arm_left",
            Self::ArmRight => "arm_right",
        }
    }

    /// Built-in human-readable label.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::AbdomenLeft => "Живот слева",
            Self::AbdomenRight => "Живот справа",
            Self::ArmLeft => "Рука слева",
            Self::ArmRight => "Рука справа",
        }
    }
}

impl Display for InjectionSite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error for site wire values outside the fixed enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSiteError(pub String);

impl Display for UnknownSiteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown injection site `{}`; expected abdomen_left|abdomen_right|arm_left|arm_right",
            self.0
        )
    }
}

impl std::error::Error for UnknownSiteError {}

impl FromStr for InjectionSite {
    type Err = UnknownSiteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|site| site.as_str() == value)
            .ok_or_else(|| UnknownSiteError(value.to_string()))
    }
}

/// Site label dictionary persisted alongside the records.
///
/// Keyed by wire value so that backups carrying extra or renamed labels are
/// restored verbatim.
pub type SiteLabels = BTreeMap<String, String>;

/// Builds the built-in label dictionary.
pub fn default_site_labels() -> SiteLabels {
    InjectionSite::ALL
        .into_iter()
        .map(|site| (site.as_str().to_string(), site.default_label().to_string()))
        .collect()
}

/// Looks up `site` in `labels`, falling back to the built-in label.
pub fn site_label(labels: &SiteLabels, site: InjectionSite) -> &str {
    labels
        .get(site.as_str())
        .map(String::as_str)
        .unwrap_or_else(|| site.default_label())
}

/// Preset doses in mg offered by entry forms.
pub const DEFAULT_DOSES: [f64; 4] = [0.25, 0.5, 1.0, 1.5];
