use std::sync::Arc;

use axum::{Json, extract::Extension};
use chrono::Utc;

use heartrisk_ai::InferenceEngine;

use crate::app::dto::HealthResponse;

pub async fn health(Extension(engine): Extension<Arc<InferenceEngine>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        model_loaded: engine.has_model(),
        scaler_loaded: engine.has_scaler(),
        features: engine.schema().len(),
    })
}
