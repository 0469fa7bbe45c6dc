//! Daily calorie estimate (Mifflin-St Jeor).
//!
//! # Invariants
//! - Requires gender, a current weight, height and age; otherwise refuses
//!   with the list of missing inputs.
//! - Current weight is the latest logged weight, else the profile start weight.

use crate::model::profile::{Gender, UserProfile};
use crate::model::record::WeightEntry;
use crate::service::dashboard::latest_by_date;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Physical activity multiplier applied to the basal metabolic rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityLevel {
    /// Desk job, little exercise.
    #[default]
    Sedentary,
    /// Training 1-3 times a week.
    Light,
    /// Training 3-5 times a week.
    Moderate,
    /// Training 6-7 times a week.
    High,
    /// Heavy physical work or professional sport.
    VeryHigh,
}

impl ActivityLevel {
    pub fn factor(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::High => 1.725,
            Self::VeryHigh => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "very-high" | "very_high" => Ok(Self::VeryHigh),
            other => Err(format!(
                "unsupported activity level `{other}`; expected sedentary|light|moderate|high|very-high"
            )),
        }
    }
}

/// Input the estimate could not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalorieInput {
    Gender,
    CurrentWeight,
    Height,
    Age,
}

impl CalorieInput {
    fn as_str(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::CurrentWeight => "current weight",
            Self::Height => "height",
            Self::Age => "age",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalorieError {
    pub missing: Vec<CalorieInput>,
}

impl Display for CalorieError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names = self
            .missing
            .iter()
            .map(|input| input.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "cannot estimate daily calories; missing: {names}")
    }
}

impl Error for CalorieError {}

/// Latest logged weight, falling back to the profile start weight.
pub fn current_weight_kg(profile: &UserProfile, weights: &[WeightEntry]) -> Option<f64> {
    latest_by_date(weights)
        .map(|entry| entry.weight)
        .or(profile.start_weight)
        .filter(|weight| *weight > 0.0)
}

/// Estimates total daily energy expenditure in kcal.
pub fn estimate_daily_calories(
    profile: &UserProfile,
    weights: &[WeightEntry],
    activity: ActivityLevel,
) -> Result<u32, CalorieError> {
    let weight = current_weight_kg(profile, weights);
    let height = profile.height.filter(|value| *value > 0.0);
    let age = profile.age.filter(|value| *value > 0.0);

    let offset = match profile.gender {
        Gender::Male => Some(5.0),
        Gender::Female => Some(-161.0),
        Gender::Unset => None,
    };

    match (offset, weight, height, age) {
        (Some(offset), Some(weight), Some(height), Some(age)) => {
            let bmr = 10.0 * weight + 6.25 * height - 5.0 * age + offset;
            Ok((bmr * activity.factor()).round().max(0.0) as u32)
        }
        _ => Err(missing_inputs(profile.gender, weight, height, age)),
    }
}

fn missing_inputs(
    gender: Gender,
    weight: Option<f64>,
    height: Option<f64>,
    age: Option<f64>,
) -> CalorieError {
    let mut missing = Vec::new();
    if gender == Gender::Unset {
        missing.push(CalorieInput::Gender);
    }
    if weight.is_none() {
        missing.push(CalorieInput::CurrentWeight);
    }
    if height.is_none() {
        missing.push(CalorieInput::Height);
    }
    if age.is_none() {
        missing.push(CalorieInput::Age);
    }
    CalorieError { missing }
}
