use core::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use heartrisk_core::{DomainError, RiskLevel};

/// Result of one heart-disease inference.
///
/// Created fresh per call and never mutated afterwards. It carries no reference back to the
/// engine, so it can be serialized, logged or dropped freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted label: `1` = heart disease, `0` = none.
    pub prediction: u8,

    /// Class-1 probability in \[0, 1\].
    pub probability: f64,

    pub risk_level: RiskLevel,

    /// `probability * 100` with one decimal and a trailing `%`.
    pub confidence: String,

    /// Feature name -> weight, in schema order.
    pub feature_importance: FeatureImportance,

    pub recommendations: Vec<String>,
}

/// Format a probability as the confidence string, e.g. `0.734` -> `"73.4%"`.
pub fn format_confidence(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Ordered feature -> weight mapping.
///
/// Serialized as a JSON object whose keys keep schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureImportance {
    entries: Vec<(String, f64)>,
}

impl FeatureImportance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: impl Into<String>, weight: f64) {
        self.entries.push((feature.into(), weight));
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, w)| *w)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, w)| (name.as_str(), *w))
    }
}

impl FromIterator<(String, f64)> for FeatureImportance {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for FeatureImportance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, weight) in &self.entries {
            map.serialize_entry(name, weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureImportance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ImportanceVisitor;

        impl<'de> Visitor<'de> for ImportanceVisitor {
            type Value = FeatureImportance;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of feature name to weight")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, weight)) = access.next_entry::<String, f64>()? {
                    entries.push((name, weight));
                }
                Ok(FeatureImportance { entries })
            }
        }

        deserializer.deserialize_map(ImportanceVisitor)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    /// No classifier was resolved at startup; the request cannot be served.
    #[error("no trained model is loaded")]
    ModelUnavailable,

    /// The record (or its aligned vector) does not fit the loaded artifacts.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The classifier returned something that is not a usable probability.
    #[error("invalid model output: {0}")]
    InvalidModelOutput(String),

    /// An adapter panicked while scoring; caught by [`InferenceEngine::predict_isolated`].
    ///
    /// [`InferenceEngine::predict_isolated`]: crate::InferenceEngine::predict_isolated
    #[error("classifier panicked: {0}")]
    ClassifierPanicked(String),
}

impl From<DomainError> for InferenceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvariantViolation(msg) => {
                InferenceError::SchemaMismatch(msg)
            }
        }
    }
}
