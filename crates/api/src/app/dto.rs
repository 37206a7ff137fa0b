use serde::Serialize;

use heartrisk_ai::PredictionResult;
use heartrisk_core::PatientRecord;

// -------------------------
// Response DTOs
// -------------------------

/// Single prediction plus an echo of what was submitted.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub input_data: PatientRecord,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String, // RFC3339
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub features: usize,
}
