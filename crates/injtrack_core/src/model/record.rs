//! Tracked record types.
//!
//! # Responsibility
//! - Define the four dated record kinds and their creation inputs.
//! - Provide form-layer validation helpers.
//!
//! # Invariants
//! - `id` is unique within its own collection and never reused.
//! - `date` is a calendar day without a time component.
//! - The repository trusts its inputs; `validate()` is for callers.

use super::number::{finite, finite_opt};
use super::site::InjectionSite;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque record identifier, unique within one collection.
pub type RecordId = String;

/// Generates a fresh record identifier.
pub fn new_record_id() -> RecordId {
    Uuid::new_v4().to_string()
}

/// Collection of origin for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Injection,
    Weight,
    SideEffect,
    Measurement,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Injection => "injection",
            Self::Weight => "weight",
            Self::SideEffect => "side-effect",
            Self::Measurement => "measurement",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Common accessors shared by every record kind.
pub trait Record: Clone {
    const KIND: RecordKind;

    fn id(&self) -> &str;
    fn date(&self) -> NaiveDate;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injection {
    pub id: RecordId,
    pub date: NaiveDate,
    /// Milligrams.
    #[serde(serialize_with = "finite")]
    pub dose: f64,
    pub site: InjectionSite,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: RecordId,
    pub date: NaiveDate,
    /// Kilograms.
    #[serde(serialize_with = "finite")]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffect {
    pub id: RecordId,
    pub date: NaiveDate,
    pub description: String,
}

/// Body circumferences in centimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: RecordId,
    pub date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_opt"
    )]
    pub neck: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_opt"
    )]
    pub waist: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_opt"
    )]
    pub hips: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_opt"
    )]
    pub shoulders: Option<f64>,
}

macro_rules! impl_record {
    ($ty:ty, $kind:expr) => {
        impl Record for $ty {
            const KIND: RecordKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn date(&self) -> NaiveDate {
                self.date
            }
        }
    };
}

impl_record!(Injection, RecordKind::Injection);
impl_record!(WeightEntry, RecordKind::Weight);
impl_record!(SideEffect, RecordKind::SideEffect);
impl_record!(Measurement, RecordKind::Measurement);

/// Creation input for `Injection` (everything except the id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewInjection {
    pub date: NaiveDate,
    pub dose: f64,
    pub site: InjectionSite,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWeightEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSideEffect {
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewMeasurement {
    pub date: NaiveDate,
    pub neck: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub shoulders: Option<f64>,
}

impl NewInjection {
    pub fn into_record(self, id: RecordId) -> Injection {
        Injection {
            id,
            date: self.date,
            dose: self.dose,
            site: self.site,
            comment: self.comment,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_positive("dose", self.dose)
    }
}

impl NewWeightEntry {
    pub fn into_record(self, id: RecordId) -> WeightEntry {
        WeightEntry {
            id,
            date: self.date,
            weight: self.weight,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_positive("weight", self.weight)
    }
}

impl NewSideEffect {
    pub fn into_record(self, id: RecordId) -> SideEffect {
        SideEffect {
            id,
            date: self.date,
            description: self.description,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.description.trim().is_empty() {
            return Err(RecordValidationError::BlankDescription);
        }
        Ok(())
    }
}

impl NewMeasurement {
    pub fn into_record(self, id: RecordId) -> Measurement {
        Measurement {
            id,
            date: self.date,
            neck: self.neck,
            waist: self.waist,
            hips: self.hips,
            shoulders: self.shoulders,
        }
    }

    fn values(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("neck", self.neck),
            ("waist", self.waist),
            ("hips", self.hips),
            ("shoulders", self.shoulders),
        ]
    }

    /// A measurement needs at least one present value; each present value
    /// must be positive.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        let values = self.values();
        if values.iter().all(|(_, value)| value.is_none()) {
            return Err(RecordValidationError::EmptyMeasurement);
        }
        for (field, value) in values {
            if let Some(value) = value {
                require_positive(field, value)?;
            }
        }
        Ok(())
    }
}

impl Measurement {
    /// Present values in display order.
    pub fn present_values(&self) -> Vec<(&'static str, f64)> {
        [
            ("neck", self.neck),
            ("waist", self.waist),
            ("hips", self.hips),
            ("shoulders", self.shoulders),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect()
    }
}

/// Form-layer validation failure for record inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    NotPositive { field: &'static str, value: f64 },
    BlankDescription,
    EmptyMeasurement,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be a positive number, got {value}")
            }
            Self::BlankDescription => write!(f, "description cannot be empty"),
            Self::EmptyMeasurement => {
                write!(f, "at least one of neck, waist, hips or shoulders is required")
            }
        }
    }
}

impl Error for RecordValidationError {}

fn require_positive(field: &'static str, value: f64) -> Result<(), RecordValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RecordValidationError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        new_record_id, NewInjection, NewMeasurement, NewSideEffect, NewWeightEntry,
        RecordValidationError,
    };
    use crate::model::site::InjectionSite;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(new_record_id(), new_record_id());
    }

    #[test]
    fn dose_and_weight_must_be_positive() {
        let injection = NewInjection {
            date: day(),
            dose: 0.0,
            site: InjectionSite::ArmLeft,
            comment: None,
        };
        assert_eq!(
            injection.validate().unwrap_err(),
            RecordValidationError::NotPositive {
                field: "dose",
                value: 0.0
            }
        );

        let weight = NewWeightEntry {
            date: day(),
            weight: f64::NAN,
        };
        assert!(weight.validate().is_err());
    }

    #[test]
    fn blank_side_effect_is_rejected() {
        let effect = NewSideEffect {
            date: day(),
            description: "   ".to_string(),
        };
        assert_eq!(
            effect.validate().unwrap_err(),
            RecordValidationError::BlankDescription
        );
    }

    #[test]
    fn measurement_requires_one_positive_value() {
        let empty = NewMeasurement {
            date: day(),
            ..NewMeasurement::default()
        };
        assert_eq!(
            empty.validate().unwrap_err(),
            RecordValidationError::EmptyMeasurement
        );

        let waist_only = NewMeasurement {
            date: day(),
            waist: Some(88.5),
            ..NewMeasurement::default()
        };
        waist_only.validate().unwrap();

        let negative_hips = NewMeasurement {
            date: day(),
            hips: Some(-1.0),
            ..NewMeasurement::default()
        };
        assert!(matches!(
            negative_hips.validate().unwrap_err(),
            RecordValidationError::NotPositive { field: "hips", .. }
        ));
    }
}
