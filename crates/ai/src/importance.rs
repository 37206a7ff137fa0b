//! Synthetic feature-importance fallback.

use heartrisk_core::FeatureSchema;

use crate::result::FeatureImportance;

/// Weights for the canonical 13 features, in schema order.
///
/// These are a fixed approximation, not values derived from any fitted model. They are only
/// reported when the loaded classifier exposes no native importances.
pub const DEFAULT_SYNTHETIC_WEIGHTS: [f64; 13] = [
    0.12, 0.08, 0.15, 0.10, 0.09, 0.05, 0.07, 0.13, 0.06, 0.08, 0.04, 0.02, 0.01,
];

/// Weight assigned to schema positions past the end of the synthetic vector.
pub const NOMINAL_WEIGHT: f64 = 0.01;

/// Positional fallback weights used when a classifier has no native importances.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticImportance {
    weights: Vec<f64>,
    nominal: f64,
}

impl SyntheticImportance {
    pub fn new(weights: Vec<f64>, nominal: f64) -> Self {
        Self { weights, nominal }
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.weights.get(index).copied().unwrap_or(self.nominal)
    }

    /// One entry per schema feature, matched by position.
    pub fn for_schema(&self, schema: &FeatureSchema) -> FeatureImportance {
        schema
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), self.weight(i)))
            .collect()
    }
}

impl Default for SyntheticImportance {
    fn default() -> Self {
        Self::new(DEFAULT_SYNTHETIC_WEIGHTS.to_vec(), NOMINAL_WEIGHT)
    }
}
