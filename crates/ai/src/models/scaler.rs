use serde::{Deserialize, Serialize};

use crate::model::Scaler;
use crate::models::{InvalidArtifact, all_finite, check_width};
use crate::result::InferenceError;

/// Standardization fit offline: `(x - mean) / scale`.
///
/// A zero `scale` entry (constant feature at fit time) is treated as `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    pub fn validate(&self) -> Result<(), InvalidArtifact> {
        if self.mean.is_empty() {
            return Err(InvalidArtifact::new("scaler has no features"));
        }
        if self.mean.len() != self.scale.len() {
            return Err(InvalidArtifact::new(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if !(all_finite(&self.mean) && all_finite(&self.scale)) {
            return Err(InvalidArtifact::new("scaler parameters must be finite"));
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> Option<usize> {
        Some(self.mean.len())
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_width(self.mean.len(), features)?;
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| {
                let s = if *s == 0.0 { 1.0 } else { *s };
                (x - m) / s
            })
            .collect())
    }
}
