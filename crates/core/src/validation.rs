//! Field-level validation of patient records.
//!
//! Alignment in the inference path is permissive (absent fields become `0`). These checks
//! are the stricter gate applied at the edge, before a record reaches the engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::record::PatientRecord;
use crate::schema::CANONICAL_FEATURES;

/// Outcome of range validation. `errors` keeps the canonical field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Presence/type failure of the required-field gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequiredFieldsError {
    /// Canonical fields absent from the record, in canonical order.
    #[error("Missing required fields: {}", .0.join(", "))]
    Missing(Vec<String>),
    /// First field whose value cannot be read as a number.
    #[error("Invalid value for field {field}: {value}")]
    NotNumeric { field: String, value: String },
}

/// All 13 canonical fields present, each numeric-coercible.
pub fn check_required_fields(record: &PatientRecord) -> Result<(), RequiredFieldsError> {
    let missing: Vec<String> = CANONICAL_FEATURES
        .iter()
        .filter(|f| !record.contains(f))
        .map(|f| f.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RequiredFieldsError::Missing(missing));
    }

    for field in CANONICAL_FEATURES {
        if record.numeric(field).is_err() {
            let value = record
                .get(field)
                .map(|v| v.to_string())
                .unwrap_or_default();
            return Err(RequiredFieldsError::NotNumeric {
                field: field.to_string(),
                value,
            });
        }
    }

    Ok(())
}

enum Rule {
    IntRange(i64, i64, &'static str),
    IntOneOf(&'static [i64], &'static str),
    FloatRange(f64, f64, &'static str),
}

fn rule_for(field: &str) -> Rule {
    match field {
        "age" => Rule::IntRange(20, 100, "Age must be between 20 and 100"),
        "sex" => Rule::IntOneOf(&[0, 1], "Sex must be 0 (female) or 1 (male)"),
        "cp" => Rule::IntOneOf(&[0, 1, 2, 3], "Chest pain type must be 0, 1, 2, or 3"),
        "trestbps" => Rule::IntRange(
            90,
            200,
            "Resting blood pressure must be between 90 and 200 mm Hg",
        ),
        "chol" => Rule::IntRange(100, 600, "Cholesterol must be between 100 and 600 mg/dl"),
        "fbs" => Rule::IntOneOf(&[0, 1], "Fasting blood sugar must be 0 or 1"),
        "restecg" => Rule::IntOneOf(&[0, 1, 2], "Resting ECG must be 0, 1, or 2"),
        "thalach" => Rule::IntRange(60, 220, "Maximum heart rate must be between 60 and 220 bpm"),
        "exang" => Rule::IntOneOf(&[0, 1], "Exercise induced angina must be 0 or 1"),
        "oldpeak" => Rule::FloatRange(0.0, 10.0, "ST depression must be between 0 and 10"),
        "slope" => Rule::IntOneOf(&[0, 1, 2], "Slope must be 0, 1, or 2"),
        "ca" => Rule::IntRange(0, 3, "Number of major vessels must be between 0 and 3"),
        _ => Rule::IntOneOf(&[0, 1, 2], "Thalassemia must be 0, 1, or 2"),
    }
}

/// Integer reading: JSON numbers truncate toward zero, strings must be integral.
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Range-check every canonical field, collecting all errors.
pub fn validate_patient_record(record: &PatientRecord) -> ValidationReport {
    let mut errors = Vec::new();

    for field in CANONICAL_FEATURES {
        let Some(value) = record.get(field) else {
            errors.push(format!("Missing required field: {field}"));
            continue;
        };

        let type_error = || format!("Invalid data type for field: {field}");

        match rule_for(field) {
            Rule::IntRange(lo, hi, msg) => match as_int(value) {
                Some(v) if (lo..=hi).contains(&v) => {}
                Some(_) => errors.push(msg.to_string()),
                None => errors.push(type_error()),
            },
            Rule::IntOneOf(allowed, msg) => match as_int(value) {
                Some(v) if allowed.contains(&v) => {}
                Some(_) => errors.push(msg.to_string()),
                None => errors.push(type_error()),
            },
            Rule::FloatRange(lo, hi, msg) => match as_float(value) {
                Some(v) if (lo..=hi).contains(&v) => {}
                Some(_) => errors.push(msg.to_string()),
                None => errors.push(type_error()),
            },
        }
    }

    ValidationReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> PatientRecord {
        serde_json::from_value(json!({
            "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233, "fbs": 1,
            "restecg": 0, "thalach": 150, "exang": 0, "oldpeak": 2.3, "slope": 0,
            "ca": 0, "thal": 1
        }))
        .unwrap()
    }

    #[test]
    fn valid_record_passes() {
        let report = validate_patient_record(&valid_record());
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
        assert!(check_required_fields(&valid_record()).is_ok());
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let record = valid_record().with("age", 15).with("cp", 4).with("oldpeak", 12.5);
        let report = validate_patient_record(&record);
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![
                "Age must be between 20 and 100".to_string(),
                "Chest pain type must be 0, 1, 2, or 3".to_string(),
                "ST depression must be between 0 and 10".to_string(),
            ]
        );
    }

    #[test]
    fn missing_and_mistyped_fields_are_reported() {
        let mut record = valid_record().with("chol", "lots");
        record.remove("thal");
        let report = validate_patient_record(&record);
        assert!(report.errors.contains(&"Invalid data type for field: chol".to_string()));
        assert!(report.errors.contains(&"Missing required field: thal".to_string()));
    }

    #[test]
    fn integer_fields_accept_numeric_strings() {
        let record = valid_record().with("age", "45").with("oldpeak", "1.2");
        assert!(validate_patient_record(&record).valid);
    }

    #[test]
    fn required_field_gate_lists_missing_fields_in_order() {
        let mut record = valid_record();
        record.remove("thal");
        record.remove("age");
        assert_eq!(
            check_required_fields(&record),
            Err(RequiredFieldsError::Missing(vec![
                "age".to_string(),
                "thal".to_string()
            ]))
        );
    }

    #[test]
    fn required_field_gate_rejects_non_numeric_values() {
        let record = valid_record().with("chol", "high");
        let err = check_required_fields(&record).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for field chol: \"high\"");
    }

    #[test]
    fn required_field_errors_read_as_std_errors() {
        let mut record = valid_record();
        record.remove("ca");
        record.remove("thal");
        let err: Box<dyn std::error::Error> = check_required_fields(&record).unwrap_err().into();
        assert_eq!(err.to_string(), "Missing required fields: ca, thal");
        assert!(err.source().is_none());
    }
}
