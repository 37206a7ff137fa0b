//! Single-record inference: align -> scale -> classify -> shape result.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use heartrisk_core::{FeatureSchema, PatientRecord, RiskLevel};

use crate::batch::{BatchOutcome, BatchRunner};
use crate::importance::SyntheticImportance;
use crate::model::{Classifier, Scaler};
use crate::result::{FeatureImportance, InferenceError, PredictionResult, format_confidence};

/// Inference context built once at startup and shared by every call.
///
/// Holds the feature schema plus the (optional) classifier and scaler. All state is
/// read-only after construction, so the engine can sit behind an `Arc` and serve concurrent
/// callers without locking.
#[derive(Clone)]
pub struct InferenceEngine {
    schema: FeatureSchema,
    classifier: Option<Arc<dyn Classifier>>,
    scaler: Option<Arc<dyn Scaler>>,
    fallback_importance: SyntheticImportance,
}

impl InferenceEngine {
    /// Engine with no classifier and no scaler. Add them with the `with_*` builders.
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            classifier: None,
            scaler: None,
            fallback_importance: SyntheticImportance::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_scaler(mut self, scaler: Arc<dyn Scaler>) -> Self {
        self.scaler = Some(scaler);
        self
    }

    pub fn with_fallback_importance(mut self, fallback: SyntheticImportance) -> Self {
        self.fallback_importance = fallback;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn has_model(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.classifier.as_deref().map(|c| c.name())
    }

    /// Raw feature vector in schema order (before scaling).
    ///
    /// Absent fields become `0.0`; fields outside the schema are dropped.
    pub fn align(&self, record: &PatientRecord) -> Result<Vec<f64>, InferenceError> {
        let extra = record.extra_fields(&self.schema);
        if !extra.is_empty() {
            debug!(fields = ?extra, "ignoring fields outside the feature schema");
        }
        let missing = record.missing_fields(&self.schema);
        if !missing.is_empty() {
            debug!(fields = ?missing, "defaulting absent features to 0");
        }
        Ok(record.align(&self.schema)?)
    }

    /// Aligned vector after the scaler (if any).
    pub fn preprocess(&self, record: &PatientRecord) -> Result<Vec<f64>, InferenceError> {
        let aligned = self.align(record)?;
        match &self.scaler {
            Some(scaler) => {
                if let Some(width) = scaler.n_features() {
                    if width != aligned.len() {
                        return Err(InferenceError::SchemaMismatch(format!(
                            "scaler expects {width} features, schema has {}",
                            aligned.len()
                        )));
                    }
                }
                scaler.transform(&aligned)
            }
            None => Ok(aligned),
        }
    }

    pub fn predict(&self, record: &PatientRecord) -> Result<PredictionResult, InferenceError> {
        let features = self.preprocess(record)?;

        let classifier = self
            .classifier
            .as_deref()
            .ok_or(InferenceError::ModelUnavailable)?;

        if let Some(width) = classifier.n_features() {
            if width != features.len() {
                return Err(InferenceError::SchemaMismatch(format!(
                    "model expects {width} features, schema has {}",
                    features.len()
                )));
            }
        }

        let (prediction, [_, p1]) = classifier.classify(&features)?;
        if !p1.is_finite() {
            return Err(InferenceError::InvalidModelOutput(format!(
                "class-1 probability is {p1}"
            )));
        }
        if prediction > 1 {
            return Err(InferenceError::InvalidModelOutput(format!(
                "label {prediction} is not binary"
            )));
        }
        let probability = p1.clamp(0.0, 1.0);

        let risk_level = RiskLevel::from_probability(probability);
        let feature_importance = self.feature_importance(classifier)?;

        debug!(
            model = classifier.name(),
            prediction,
            probability,
            risk_level = %risk_level,
            "prediction complete"
        );

        Ok(PredictionResult {
            prediction,
            probability,
            risk_level,
            confidence: format_confidence(probability),
            feature_importance,
            recommendations: risk_level
                .recommendations()
                .iter()
                .map(|r| r.to_string())
                .collect(),
        })
    }

    /// Like [`predict`](Self::predict), but a panicking classifier becomes
    /// [`InferenceError::ClassifierPanicked`] instead of unwinding into the caller.
    pub fn predict_isolated(
        &self,
        record: &PatientRecord,
    ) -> Result<PredictionResult, InferenceError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.predict(record))).unwrap_or_else(|payload| {
            Err(InferenceError::ClassifierPanicked(panic_message(
                payload.as_ref(),
            )))
        })
    }

    /// Predict each record independently; see [`BatchRunner`].
    pub fn predict_batch(&self, records: &[PatientRecord]) -> Vec<BatchOutcome> {
        BatchRunner::new(self).run(records)
    }

    fn feature_importance(
        &self,
        classifier: &dyn Classifier,
    ) -> Result<FeatureImportance, InferenceError> {
        match classifier.feature_importances() {
            Some(native) => {
                if native.len() != self.schema.len() {
                    return Err(InferenceError::InvalidModelOutput(format!(
                        "{} feature importances for {} schema features",
                        native.len(),
                        self.schema.len()
                    )));
                }
                Ok(self
                    .schema
                    .iter()
                    .zip(native)
                    .map(|(name, w)| (name.to_string(), *w))
                    .collect())
            }
            None => Ok(self.fallback_importance.for_schema(&self.schema)),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown cause".to_string()
    }
}

impl core::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("schema", &self.schema)
            .field("model", &self.model_name())
            .field("scaler", &self.has_scaler())
            .finish()
    }
}
