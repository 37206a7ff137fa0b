//! Concrete classifier and scaler adapters.
//!
//! Offline training exports these as JSON documents:
//! - `linear`: logistic regression (no native importances)
//! - `tree`: decision tree and random forest (impurity importances stored alongside)
//! - `scaler`: standard scaler
//!
//! Every adapter has a `validate` step run at load time, so a structurally broken artifact
//! is rejected before the engine ever sees it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Classifier;
use crate::result::InferenceError;

pub mod linear;
pub mod scaler;
pub mod tree;

pub use linear::LogisticRegression;
pub use scaler::StandardScaler;
pub use tree::{DecisionTree, RandomForest, TreeNode};

/// A deserialized artifact whose content is internally inconsistent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidArtifact(pub String);

impl InvalidArtifact {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Persisted classifier, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), InvalidArtifact> {
        match self {
            ModelArtifact::LogisticRegression(m) => m.validate(),
            ModelArtifact::DecisionTree(m) => m.validate(),
            ModelArtifact::RandomForest(m) => m.validate(),
        }
    }

    /// Input width the artifact was fit on.
    pub fn n_features(&self) -> usize {
        match self {
            ModelArtifact::LogisticRegression(m) => m.coefficients.len(),
            ModelArtifact::DecisionTree(m) => m.n_features,
            ModelArtifact::RandomForest(m) => m.n_features,
        }
    }

    pub fn into_classifier(self) -> Arc<dyn Classifier> {
        match self {
            ModelArtifact::LogisticRegression(m) => Arc::new(m),
            ModelArtifact::DecisionTree(m) => Arc::new(m),
            ModelArtifact::RandomForest(m) => Arc::new(m),
        }
    }
}

/// Reject vectors whose width differs from what the artifact was fit on.
pub(crate) fn check_width(expected: usize, features: &[f64]) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::SchemaMismatch(format!(
            "expected {expected} features, got {}",
            features.len()
        )));
    }
    Ok(())
}

pub(crate) fn all_finite(xs: &[f64]) -> bool {
    xs.iter().all(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn artifact_kind_selects_adapter() {
        let artifact: ModelArtifact = serde_json::from_value(json!({
            "kind": "logistic_regression",
            "coefficients": [0.5, -0.25],
            "intercept": 0.1
        }))
        .unwrap();
        artifact.validate().unwrap();

        let classifier = artifact.into_classifier();
        assert_eq!(classifier.name(), "logistic_regression");
        assert_eq!(classifier.n_features(), Some(2));
    }

    #[test]
    fn unknown_kind_fails_to_deserialize() {
        let res = serde_json::from_value::<ModelArtifact>(json!({
            "kind": "svm",
            "support_vectors": []
        }));
        assert!(res.is_err());
    }
}
