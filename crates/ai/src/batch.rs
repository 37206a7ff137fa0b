use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use heartrisk_core::PatientRecord;

use crate::engine::InferenceEngine;
use crate::result::PredictionResult;

/// Inline failure entry for one record of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn prediction_failed(message: impl Into<String>) -> Self {
        Self {
            error: "Prediction failed".to_string(),
            message: message.into(),
        }
    }
}

/// Per-record batch output: either a result or an inline error.
///
/// Untagged on the wire, so clients see the plain result object or `{error, message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    Prediction(PredictionResult),
    Failed(ErrorRecord),
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Prediction(_))
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            BatchOutcome::Prediction(p) => Some(p),
            BatchOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            BatchOutcome::Prediction(_) => None,
            BatchOutcome::Failed(e) => Some(e),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of(outcomes: &[BatchOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

/// Runs the engine over a sequence of records, one output per input, in input order.
///
/// Records are processed sequentially and independently: an error (or a panic inside a
/// classifier adapter) at position `i` becomes an [`ErrorRecord`] at `i` and the runner moves
/// on to `i + 1`. The batch call itself never fails.
#[derive(Debug, Copy, Clone)]
pub struct BatchRunner<'a> {
    engine: &'a InferenceEngine,
}

impl<'a> BatchRunner<'a> {
    pub fn new(engine: &'a InferenceEngine) -> Self {
        Self { engine }
    }

    pub fn run(&self, records: &[PatientRecord]) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.run_one(index, record))
            .collect();

        let summary = BatchSummary::of(&outcomes);
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch prediction finished"
        );
        outcomes
    }

    fn run_one(&self, index: usize, record: &PatientRecord) -> BatchOutcome {
        let message = match self.engine.predict_isolated(record) {
            Ok(result) => return BatchOutcome::Prediction(result),
            Err(e) => e.to_string(),
        };

        warn!(index, error = %message, "batch item failed");
        BatchOutcome::Failed(ErrorRecord::prediction_failed(message))
    }
}
