use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tempfile::TempDir;

use heartrisk_ai::{Classifier, InferenceEngine, InferenceError};
use heartrisk_core::FeatureSchema;
use heartrisk_infra::ArtifactResolver;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(engine: InferenceEngine) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = heartrisk_api::app::build_app(Arc::new(engine));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Artifacts written to a scratch directory and resolved the same way `main` does.
fn engine_from_artifacts(dir: &TempDir) -> InferenceEngine {
    let mut coefficients = vec![0.0; 13];
    coefficients[0] = 0.05; // age
    coefficients[9] = 0.4; // oldpeak
    let model = json!({
        "kind": "logistic_regression",
        "coefficients": coefficients,
        "intercept": -3.0
    });
    let scaler = json!({ "mean": vec![0.0; 13], "scale": vec![1.0; 13] });
    std::fs::write(dir.path().join("best_model.json"), model.to_string()).unwrap();
    std::fs::write(dir.path().join("scaler.json"), scaler.to_string()).unwrap();

    let legacy = TempDir::new().unwrap();
    ArtifactResolver::with_legacy_fallback(dir.path(), legacy.path())
        .load()
        .expect("artifacts should load")
        .into_engine()
}

fn sample_patient() -> Value {
    json!({
        "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233, "fbs": 1,
        "restecg": 0, "thalach": 150, "exang": 0, "oldpeak": 2.3, "slope": 0,
        "ca": 0, "thal": 1
    })
}

#[tokio::test]
async fn health_reports_loaded_artifacts() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::spawn(engine_from_artifacts(&dir)).await;

    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["scaler_loaded"], true);
    assert_eq!(body["features"], 13);
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn predict_returns_result_and_echoes_input() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::spawn(engine_from_artifacts(&dir)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/predict"))
        .json(&sample_patient())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    // 0.05 * 63 + 0.4 * 2.3 - 3.0 = 1.07 -> p ~ 0.745
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["risk_level"], "High");
    let probability = body["probability"].as_f64().unwrap();
    assert!((probability - 0.7446).abs() < 1e-3);
    assert_eq!(body["confidence"], "74.5%");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 4);
    assert_eq!(body["feature_importance"].as_object().unwrap().len(), 13);
    assert_eq!(body["input_data"], sample_patient());
}

#[tokio::test]
async fn predict_rejects_missing_fields() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::spawn(engine_from_artifacts(&dir)).await;
    let client = reqwest::Client::new();

    let mut patient = sample_patient();
    let obj = patient.as_object_mut().unwrap();
    obj.remove("ca");
    obj.remove("thal");

    let res = client
        .post(server.url("/api/predict"))
        .json(&patient)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_fields");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("ca"));
    assert!(message.contains("thal"));
}

#[tokio::test]
async fn predict_rejects_non_numeric_and_empty_input() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::spawn(engine_from_artifacts(&dir)).await;
    let client = reqwest::Client::new();

    let mut patient = sample_patient();
    patient["chol"] = json!("high");
    let res = client
        .post(server.url("/api/predict"))
        .json(&patient)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_value");

    let res = client
        .post(server.url("/api/predict"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "no_input");
}

#[tokio::test]
async fn predict_without_model_is_unavailable() {
    let server = TestServer::spawn(InferenceEngine::new(FeatureSchema::default())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/predict"))
        .json(&sample_patient())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "model_unavailable");

    let health: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["model_loaded"], false);
}

#[tokio::test]
async fn batch_keeps_order_and_reports_failures_inline() {
    let dir = TempDir::new().unwrap();
    let server = TestServer::spawn(engine_from_artifacts(&dir)).await;
    let client = reqwest::Client::new();

    let mut younger = sample_patient();
    younger["age"] = json!(30);
    younger["oldpeak"] = json!(0.0);

    let res = client
        .post(server.url("/api/predict/batch"))
        .json(&json!([sample_patient(), "not a record", younger]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["risk_level"], "High");
    assert_eq!(items[1]["error"], "Prediction failed");
    assert!(items[1]["message"].as_str().is_some());
    // 0.05 * 30 - 3.0 = -1.5 -> p ~ 0.18
    assert_eq!(items[2]["risk_level"], "Low");
    assert_eq!(items[2]["prediction"], 0);
}

#[tokio::test]
async fn batch_without_model_reports_every_record() {
    let server = TestServer::spawn(InferenceEngine::new(FeatureSchema::default())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/predict/batch"))
        .json(&json!([sample_patient(), sample_patient()]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["error"] == "Prediction failed"));
}

#[tokio::test]
async fn validate_lists_range_errors() {
    let server = TestServer::spawn(InferenceEngine::new(FeatureSchema::default())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/validate"))
        .json(&sample_patient())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert!(body["errors"].as_array().unwrap().is_empty());

    let mut patient = sample_patient();
    patient["age"] = json!(150);
    patient["sex"] = json!(2);
    let res = client
        .post(server.url("/api/validate"))
        .json(&patient)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["valid"], false);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], "Age must be between 20 and 100");
}

struct PanickingModel;

impl Classifier for PanickingModel {
    fn name(&self) -> &str {
        "panicking"
    }

    fn predict_proba(&self, _features: &[f64]) -> Result<[f64; 2], InferenceError> {
        panic!("tree walked off the end");
    }
}

#[tokio::test]
async fn panicking_model_returns_prediction_failed() {
    let engine =
        InferenceEngine::new(FeatureSchema::default()).with_classifier(Arc::new(PanickingModel));
    let server = TestServer::spawn(engine).await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/predict"))
        .json(&sample_patient())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "prediction_failed");
    assert!(body["message"].as_str().unwrap().contains("tree walked off the end"));

    // Same model through the batch path: inline error, still 200.
    let res = client
        .post(server.url("/api/predict/batch"))
        .json(&json!([sample_patient()]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body[0]["error"], "Prediction failed");
}
