//! `heartrisk-ai`
//!
//! **Responsibility:** turning patient records into heart-disease risk predictions.
//!
//! - `model`: capability traits (`Classifier`, `Scaler`) the engine runs against.
//! - `models`: concrete, JSON-serializable adapters produced by offline training.
//! - `engine`: schema alignment, scaling, classification and result shaping.
//! - `batch`: per-record failure isolation over sequences of records.
//!
//! Nothing here performs IO. Artifacts are loaded by `heartrisk-infra` and handed in.

pub mod batch;
pub mod engine;
pub mod importance;
pub mod model;
pub mod models;
pub mod result;

pub use batch::{BatchOutcome, BatchRunner, BatchSummary, ErrorRecord};
pub use engine::InferenceEngine;
pub use importance::SyntheticImportance;
pub use model::{Classifier, Scaler};
pub use models::{
    DecisionTree, InvalidArtifact, LogisticRegression, ModelArtifact, RandomForest,
    StandardScaler, TreeNode,
};
pub use result::{FeatureImportance, InferenceError, PredictionResult};
