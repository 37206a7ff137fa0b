use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use heartrisk_ai::InferenceError;
use heartrisk_core::RequiredFieldsError;

pub fn inference_error_to_response(err: InferenceError) -> axum::response::Response {
    match err {
        InferenceError::ModelUnavailable => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "model_unavailable",
            err.to_string(),
        ),
        InferenceError::SchemaMismatch(_)
        | InferenceError::InvalidModelOutput(_)
        | InferenceError::ClassifierPanicked(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "prediction_failed",
            err.to_string(),
        ),
    }
}

pub fn required_fields_error_to_response(err: RequiredFieldsError) -> axum::response::Response {
    let code = match err {
        RequiredFieldsError::Missing(_) => "missing_fields",
        RequiredFieldsError::NotNumeric { .. } => "invalid_value",
    };
    json_error(StatusCode::BAD_REQUEST, code, err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
