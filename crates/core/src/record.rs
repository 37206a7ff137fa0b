//! Raw patient records as submitted by clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};
use crate::schema::FeatureSchema;

/// A raw patient record: field name -> measurement.
///
/// Records are accepted as arbitrary JSON objects. Numeric coercion happens lazily, when a
/// record is aligned against a [`FeatureSchema`], so unknown or malformed fields only fail
/// if the schema actually needs them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRecord {
    fields: Map<String, Value>,
}

impl PatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Numeric value of a field, `None` if the field is absent.
    ///
    /// Numbers are taken as-is; strings are trimmed and parsed. Anything else, and any
    /// non-finite result, is a validation error.
    pub fn numeric(&self, name: &str) -> DomainResult<Option<f64>> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(value) => coerce_numeric(name, value).map(Some),
        }
    }

    /// Align the record to `schema`: one value per schema feature, in schema order.
    ///
    /// Absent fields default to `0.0`. Fields the schema does not name are ignored.
    pub fn align(&self, schema: &FeatureSchema) -> DomainResult<Vec<f64>> {
        schema
            .iter()
            .map(|name| Ok(self.numeric(name)?.unwrap_or(0.0)))
            .collect()
    }

    /// Schema features this record does not carry.
    pub fn missing_fields<'a>(&self, schema: &'a FeatureSchema) -> Vec<&'a str> {
        schema.iter().filter(|name| !self.contains(name)).collect()
    }

    /// Record fields the schema does not name.
    pub fn extra_fields(&self, schema: &FeatureSchema) -> Vec<&str> {
        self.field_names()
            .filter(|name| !schema.contains(name))
            .collect()
    }
}

impl From<Map<String, Value>> for PatientRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

impl<S: Into<String>, const N: usize> From<[(S, f64); N]> for PatientRecord {
    fn from(pairs: [(S, f64); N]) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |record, (name, value)| record.with(name, value))
    }
}

fn coerce_numeric(name: &str, value: &Value) -> DomainResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(DomainError::validation(format!(
            "field `{name}` is not numeric: {value}"
        ))),
    }
}
