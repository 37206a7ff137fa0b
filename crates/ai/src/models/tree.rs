use serde::{Deserialize, Serialize};

use crate::model::Classifier;
use crate::models::{InvalidArtifact, all_finite, check_width};
use crate::result::InferenceError;

/// One node of a binary decision tree.
///
/// Nodes are stored in pre-order: a split's children always sit at larger indices than the
/// split itself, which is what makes traversal terminate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `features[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class weights `[w0, w1]` (counts or fractions; normalized on read).
    Leaf { value: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub nodes: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<Vec<f64>>,
}

impl DecisionTree {
    pub fn new(n_features: usize, nodes: Vec<TreeNode>) -> Self {
        Self {
            n_features,
            nodes,
            feature_importances: None,
        }
    }

    pub fn with_feature_importances(mut self, importances: Vec<f64>) -> Self {
        self.feature_importances = Some(importances);
        self
    }

    pub fn validate(&self) -> Result<(), InvalidArtifact> {
        if self.n_features == 0 {
            return Err(InvalidArtifact::new("decision tree has n_features = 0"));
        }
        if self.nodes.is_empty() {
            return Err(InvalidArtifact::new("decision tree has no nodes"));
        }

        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= self.n_features {
                        return Err(InvalidArtifact::new(format!(
                            "node {i} splits on feature {feature}, tree has {}",
                            self.n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(InvalidArtifact::new(format!(
                            "node {i} has a non-finite threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= len {
                            return Err(InvalidArtifact::new(format!(
                                "node {i} references child {child} outside ({i}, {len})"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !all_finite(value) || value.iter().any(|w| *w < 0.0) {
                        return Err(InvalidArtifact::new(format!(
                            "leaf {i} has negative or non-finite class weights"
                        )));
                    }
                    if value[0] + value[1] <= 0.0 {
                        return Err(InvalidArtifact::new(format!("leaf {i} is empty")));
                    }
                }
            }
        }

        if let Some(importances) = &self.feature_importances {
            validate_importances(importances, self.n_features)?;
        }
        Ok(())
    }

    fn leaf_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        let mut idx = 0;
        // Bounded walk: a well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).copied().ok_or_else(|| {
                        InferenceError::SchemaMismatch(format!(
                            "split on feature {feature} outside vector of {}",
                            features.len()
                        ))
                    })?;
                    idx = if x <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => {
                    let total = value[0] + value[1];
                    if !(total.is_finite() && total > 0.0) {
                        return Err(InferenceError::InvalidModelOutput(format!(
                            "leaf {idx} has no class weight"
                        )));
                    }
                    return Ok([value[0] / total, value[1] / total]);
                }
                None => {
                    return Err(InferenceError::InvalidModelOutput(format!(
                        "tree references missing node {idx}"
                    )));
                }
            }
        }
        Err(InferenceError::InvalidModelOutput(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &str {
        "decision_tree"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        check_width(self.n_features, features)?;
        self.leaf_proba(features)
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }
}

/// Bagged ensemble of decision trees; probabilities are the mean over trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
    pub feature_importances: Vec<f64>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), InvalidArtifact> {
        if self.trees.is_empty() {
            return Err(InvalidArtifact::new("random forest has no trees"));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.n_features != self.n_features {
                return Err(InvalidArtifact::new(format!(
                    "tree {i} expects {} features, forest expects {}",
                    tree.n_features, self.n_features
                )));
            }
            tree.validate()
                .map_err(|e| InvalidArtifact::new(format!("tree {i}: {e}")))?;
        }
        validate_importances(&self.feature_importances, self.n_features)
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        check_width(self.n_features, features)?;
        if self.trees.is_empty() {
            return Err(InferenceError::InvalidModelOutput(
                "random forest has no trees".to_string(),
            ));
        }

        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [p0, p1] = tree.leaf_proba(features)?;
            sum[0] += p0;
            sum[1] += p1;
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        Some(&self.feature_importances)
    }
}

fn validate_importances(importances: &[f64], n_features: usize) -> Result<(), InvalidArtifact> {
    if importances.len() != n_features {
        return Err(InvalidArtifact::new(format!(
            "{} feature importances for {n_features} features",
            importances.len()
        )));
    }
    if !all_finite(importances) || importances.iter().any(|w| *w < 0.0) {
        return Err(InvalidArtifact::new(
            "feature importances must be finite and non-negative",
        ));
    }
    Ok(())
}
