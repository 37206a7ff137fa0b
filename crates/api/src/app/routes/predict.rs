use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use tracing::{error, info};

use heartrisk_ai::{BatchOutcome, ErrorRecord, InferenceEngine};
use heartrisk_core::{PatientRecord, check_required_fields, validate_patient_record};

use crate::app::{dto, errors};
use crate::context::RequestContext;

pub async fn predict(
    Extension(engine): Extension<Arc<InferenceEngine>>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<PatientRecord>, JsonRejection>,
) -> axum::response::Response {
    let record = match body {
        Ok(Json(record)) => record,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_json", e.body_text()),
    };

    if record.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "no_input", "No input data provided");
    }

    // The engine would zero-fill missing fields; the HTTP edge is stricter.
    if let Err(e) = check_required_fields(&record) {
        return errors::required_fields_error_to_response(e);
    }

    match engine.predict_isolated(&record) {
        Ok(result) => {
            info!(
                request_id = %ctx.request_id(),
                prediction = result.prediction,
                risk_level = %result.risk_level,
                "prediction served"
            );
            Json(dto::PredictResponse {
                result,
                input_data: record,
            })
            .into_response()
        }
        Err(e) => {
            error!(request_id = %ctx.request_id(), error = %e, "prediction failed");
            errors::inference_error_to_response(e)
        }
    }
}

/// Batch prediction over a JSON array. Per-record failures are reported inline; the call
/// itself succeeds for any well-formed array.
pub async fn predict_batch(
    Extension(engine): Extension<Arc<InferenceEngine>>,
    body: Result<Json<Vec<Value>>, JsonRejection>,
) -> axum::response::Response {
    let values = match body {
        Ok(Json(values)) => values,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_json", e.body_text()),
    };

    // Inference is CPU-bound; keep large batches off the async workers.
    let outcomes = tokio::task::spawn_blocking(move || run_batch(&engine, values)).await;

    match outcomes {
        Ok(outcomes) => Json(outcomes).into_response(),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "batch_failed",
            e.to_string(),
        ),
    }
}

/// Non-object array entries become inline errors at their own position.
fn run_batch(engine: &InferenceEngine, values: Vec<Value>) -> Vec<BatchOutcome> {
    let mut records = Vec::with_capacity(values.len());
    let mut slots = Vec::with_capacity(values.len());

    for value in values {
        match value {
            Value::Object(map) => {
                records.push(PatientRecord::from_map(map));
                slots.push(None);
            }
            other => slots.push(Some(ErrorRecord::prediction_failed(format!(
                "record must be a JSON object, got {other}"
            )))),
        }
    }

    let mut predicted = engine.predict_batch(&records).into_iter();
    slots
        .into_iter()
        .filter_map(|slot| match slot {
            Some(err) => Some(BatchOutcome::Failed(err)),
            None => predicted.next(),
        })
        .collect()
}

pub async fn validate(body: Result<Json<PatientRecord>, JsonRejection>) -> axum::response::Response {
    match body {
        Ok(Json(record)) => Json(validate_patient_record(&record)).into_response(),
        Err(e) => errors::json_error(StatusCode::BAD_REQUEST, "invalid_json", e.body_text()),
    }
}
