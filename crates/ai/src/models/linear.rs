use serde::{Deserialize, Serialize};

use crate::model::Classifier;
use crate::models::{InvalidArtifact, all_finite, check_width};
use crate::result::InferenceError;

/// Binary logistic regression: `p1 = sigmoid(w . x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidArtifact> {
        if self.coefficients.is_empty() {
            return Err(InvalidArtifact::new(
                "logistic regression has no coefficients",
            ));
        }
        if !(all_finite(&self.coefficients) && self.intercept.is_finite()) {
            return Err(InvalidArtifact::new(
                "logistic regression parameters must be finite",
            ));
        }
        Ok(())
    }

    fn decision_function(&self, features: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

/// Logistic function, split by sign to avoid overflow in `exp`.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        check_width(self.coefficients.len(), features)?;
        let p1 = sigmoid(self.decision_function(features));
        Ok([1.0 - p1, p1])
    }
}
