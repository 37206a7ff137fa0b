use axum::{Router, routing::post};

pub mod predict;
pub mod system;

/// Router for the prediction endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/predict", post(predict::predict))
        .route("/predict/batch", post(predict::predict_batch))
        .route("/validate", post(predict::validate))
}
