use crate::result::InferenceError;

/// A trained binary classifier.
///
/// Implementations are loaded once and shared read-only across threads, so every method
/// takes `&self` and must not mutate internal state.
pub trait Classifier: Send + Sync + 'static {
    /// Short identifier used in logs (e.g. `random_forest`).
    fn name(&self) -> &str;

    /// Input width the classifier was fit on, when known.
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Class probabilities `[p0, p1]` for one feature vector.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceError>;

    /// Predicted label (`0` or `1`) together with the probabilities it came from.
    ///
    /// Defaults to the most probable class; ties resolve to `0`. Adapters with their own
    /// decision rule override this rather than `predict`, so the probabilities are computed
    /// once per call.
    fn classify(&self, features: &[f64]) -> Result<(u8, [f64; 2]), InferenceError> {
        let proba = self.predict_proba(features)?;
        let [p0, p1] = proba;
        Ok((u8::from(p1 > p0), proba))
    }

    /// Predicted label (`0` or `1`).
    fn predict(&self, features: &[f64]) -> Result<u8, InferenceError> {
        self.classify(features).map(|(label, _)| label)
    }

    /// Native per-feature importances, aligned to the training feature order.
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }
}

/// A fitted feature transform. Never refit at inference time.
pub trait Scaler: Send + Sync + 'static {
    fn n_features(&self) -> Option<usize> {
        None
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}
