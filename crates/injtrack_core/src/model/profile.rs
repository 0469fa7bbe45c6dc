//! Singleton user profile.
//!
//! # Invariants
//! - Every field has a default, so a profile always exists and partial
//!   documents decode by filling gaps from `UserProfile::default()`.
//! - Unknown fields are ignored on decode.
//! - Optional numerics accept the legacy blank string `""` as unset.
//! - An explicit `null` on any field decodes like an absent field.

use super::number::finite_opt;
use super::site::InjectionSite;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "male")]
    Male,
    #[serde(rename = "female")]
    Female,
    #[default]
    #[serde(rename = "")]
    Unset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gender: Gender,
    #[serde(deserialize_with = "blank_as_none", serialize_with = "finite_opt")]
    pub age: Option<f64>,
    /// Centimeters.
    #[serde(deserialize_with = "blank_as_none", serialize_with = "finite_opt")]
    pub height: Option<f64>,
    /// Kilograms.
    #[serde(deserialize_with = "blank_as_none", serialize_with = "finite_opt")]
    pub start_weight: Option<f64>,
    /// Kilograms.
    #[serde(deserialize_with = "blank_as_none", serialize_with = "finite_opt")]
    pub goal_weight: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub medication: String,
    pub daily_calories: Option<u32>,
    /// Active rotation, in order. Empty means all four sites.
    #[serde(deserialize_with = "null_as_all_sites")]
    pub rotation_sites: Vec<InjectionSite>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: Gender::Unset,
            age: None,
            height: None,
            start_weight: None,
            goal_weight: None,
            medication: String::new(),
            daily_calories: None,
            rotation_sites: InjectionSite::ALL.to_vec(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number or \"\", got `{text}`"))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_all_sites<'de, D>(deserializer: D) -> Result<Vec<InjectionSite>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<InjectionSite>>::deserialize(deserializer)?
        .unwrap_or_else(|| InjectionSite::ALL.to_vec()))
}
