//! Serde helpers for persisted real numbers.
//!
//! # Invariants
//! - NaN and infinities fail to encode instead of being written as `null`,
//!   so a stored aggregate always decodes again.

use serde::ser::{Error, Serialize, Serializer};

pub(crate) fn finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(S::Error::custom(format!(
            "non-finite number `{value}` cannot be stored"
        )));
    }
    serializer.serialize_f64(*value)
}

pub(crate) fn finite_opt<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(number) => finite(number, serializer),
        None => value.serialize(serializer),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Sample {
        #[serde(serialize_with = "super::finite")]
        required: f64,
        #[serde(serialize_with = "super::finite_opt")]
        optional: Option<f64>,
    }

    #[test]
    fn finite_values_encode_as_numbers() {
        let text = serde_json::to_string(&Sample {
            required: 1.5,
            optional: None,
        })
        .unwrap();
        assert_eq!(text, r#"{"required":1.5,"optional":null}"#);
    }

    #[test]
    fn nan_and_infinity_are_rejected() {
        let nan = Sample {
            required: f64::NAN,
            optional: None,
        };
        let inf = Sample {
            required: 1.0,
            optional: Some(f64::INFINITY),
        };
        assert!(serde_json::to_string(&nan).is_err());
        assert!(serde_json::to_string(&inf).unwrap_err().to_string().contains("inf"));
    }
}
