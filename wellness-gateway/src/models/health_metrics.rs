use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Health metrics submitted by the risk predictor form.
///
/// Only used to check the payload. The proxy forwards the JSON it received,
/// not a re-serialisation of this struct.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_categorical_fields"))]
pub struct HealthMetrics {
    #[validate(required, range(exclusive_min = 0.0))]
    pub age: Option<f64>,

    #[validate(required, range(exclusive_min = 0.0))]
    pub bmi: Option<f64>,

    #[validate(required, range(exclusive_min = 0.0))]
    pub bp_systolic: Option<f64>,

    /// Optional. The form sends `null` when left blank.
    #[validate(range(min = 0.0))]
    pub fasting_glucose: Option<f64>,

    /// 0 = no family history of diabetes/hypertension, 1 = yes.
    #[serde(rename = "familyHistory")]
    pub family_history: Option<FormNumber>,

    /// 0 = sedentary .. 3 = very active.
    #[serde(rename = "activityLevel")]
    pub activity_level: Option<FormNumber>,
}

/// A select-box value: browsers submit these as strings (`"1"`), other
/// clients as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FormNumber::Number(n) => Some(*n),
            FormNumber::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Whether the value is a whole number in `0..=max`.
    pub fn is_level_within(&self, max: u8) -> bool {
        self.as_f64()
            .is_some_and(|v| v.fract() == 0.0 && (0.0..=f64::from(max)).contains(&v))
    }
}

pub const MAX_FAMILY_HISTORY: u8 = 1;
pub const MAX_ACTIVITY_LEVEL: u8 = 3;

fn validate_categorical_fields(metrics: &HealthMetrics) -> Result<(), ValidationError> {
    if let Some(value) = &metrics.family_history {
        if !value.is_level_within(MAX_FAMILY_HISTORY) {
            return Err(ValidationError::new("family_history_out_of_range"));
        }
    }

    if let Some(value) = &metrics.activity_level {
        if !value.is_level_within(MAX_ACTIVITY_LEVEL) {
            return Err(ValidationError::new("activity_level_out_of_range"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> HealthMetrics {
        serde_json::from_value(value).expect("payload should deserialize")
    }

    #[test]
    fn form_payload_is_valid() {
        let metrics = parse(json!({
            "age": 45.0,
            "bmi": 27.4,
            "bp_systolic": 130.0,
            "fasting_glucose": null,
            "familyHistory": "1",
            "activityLevel": "2"
        }));
        assert!(metrics.validate().is_ok());
        assert_eq!(metrics.activity_level.unwrap().as_f64(), Some(2.0));
    }

    #[test]
    fn numeric_categorical_fields_are_accepted() {
        let metrics = parse(json!({
            "age": 30, "bmi": 22, "bp_systolic": 118,
            "familyHistory": 0, "activityLevel": 3
        }));
        assert!(metrics.validate().is_ok());
    }

    #[test]
    fn missing_required_field_fails() {
        let metrics = parse(json!({ "age": 45, "bp_systolic": 130 }));
        let errors = metrics.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("bmi"));
    }

    #[test]
    fn non_positive_age_fails() {
        let metrics = parse(json!({ "age": 0, "bmi": 22, "bp_systolic": 120 }));
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn negative_glucose_fails() {
        let metrics = parse(json!({
            "age": 50, "bmi": 22, "bp_systolic": 120, "fasting_glucose": -1
        }));
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn out_of_range_activity_level_fails() {
        let metrics = parse(json!({
            "age": 50, "bmi": 22, "bp_systolic": 120, "activityLevel": "4"
        }));
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn fractional_family_history_fails() {
        let value = FormNumber::Number(0.5);
        assert!(!value.is_level_within(MAX_FAMILY_HISTORY));
        assert!(!FormNumber::Text("yes".to_string()).is_level_within(MAX_FAMILY_HISTORY));
    }
}
