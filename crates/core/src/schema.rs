//! Feature schema: the ordered feature layout a trained model was fit against.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Canonical feature order of the heart-disease dataset.
///
/// Scalers and classifiers are fit against exactly this order; it is also the schema used
/// when no persisted feature list can be found.
pub const CANONICAL_FEATURES: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Ordered, non-empty list of feature names.
///
/// Immutable once built. Cloning shares the underlying storage, so one schema can be handed
/// to every inference call without copying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Arc<[String]>,
}

impl FeatureSchema {
    /// Build a schema from an ordered list of names.
    ///
    /// Rejects empty lists, blank names and duplicates: any of those would make the vector
    /// layout ambiguous.
    pub fn new<I, S>(names: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(DomainError::invariant("feature schema must not be empty"));
        }

        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(DomainError::invariant(format!(
                    "feature schema entry {i} is blank"
                )));
            }
            if names[..i].contains(name) {
                return Err(DomainError::invariant(format!(
                    "feature `{name}` appears more than once in schema"
                )));
            }
        }

        Ok(Self {
            names: names.into(),
        })
    }

    /// The default 13-feature schema.
    pub fn canonical() -> Self {
        Self {
            names: CANONICAL_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false` for a constructed schema; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::canonical()
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = DomainError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(value: FeatureSchema) -> Self {
        value.names.to_vec()
    }
}
