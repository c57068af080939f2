//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the /api/v1/* endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use tower::ServiceExt;

use aegisops::api::{create_app, DashboardState};
use aegisops::config::MonitorConfig;
use aegisops::prediction::{fallback_result, PredictionClientError, PredictionService};
use aegisops::runtime::MonitorRuntime;
use aegisops::types::prediction::{ServiceError, ServiceErrorCode};
use aegisops::types::{
    FeatureVector, PredictionOutcome, PredictionResult, RiskLevel, TelemetryReading,
};

const MACHINE: &str = "CNC-ALPHA-921";

/// Stub prediction backends for each outcome class.
enum StubMode {
    Predicted,
    Fallback,
    ServiceError,
}

struct StubService(StubMode);

#[async_trait]
impl PredictionService for StubService {
    async fn request_prediction(
        &self,
        machine_id: &str,
        _features: &FeatureVector,
    ) -> Result<PredictionOutcome, PredictionClientError> {
        match self.0 {
            StubMode::Predicted => Ok(PredictionOutcome::Predicted(PredictionResult {
                prediction_id: "p-test-1".to_string(),
                machine_id: machine_id.to_string(),
                timestamp: Utc::now(),
                risk_score: 62.5,
                failure_probability: 0.31,
                risk_level: RiskLevel::High,
                recommended_action: "Schedule bearing inspection within 48h".to_string(),
                confidence: 0.87,
                explanation: None,
            })),
            StubMode::Fallback => Ok(PredictionOutcome::Fallback(fallback_result(machine_id))),
            StubMode::ServiceError => Err(PredictionClientError::Service(ServiceError {
                code: ServiceErrorCode::InvalidFeature,
                message: "vibration_rms out of range".to_string(),
                details: None,
            })),
        }
    }
}

fn test_state(mode: StubMode) -> DashboardState {
    DashboardState {
        runtime: Arc::new(MonitorRuntime::new(MonitorConfig::default(), Some(1))),
        prediction: Arc::new(StubService(mode)),
    }
}

fn reading(rms: f64) -> TelemetryReading {
    TelemetryReading {
        timestamp: Utc::now(),
        vibration_rms: rms,
        vibration_peak: rms * 1.7,
        vibration_kurtosis: 3.2,
        temperature: 44.0,
        power_consumption: 12.0,
        anomaly_flag: false,
    }
}

async fn ingest(state: &DashboardState, machine: &str, r: TelemetryReading) {
    let session = state.runtime.session(machine).expect("known machine");
    session.write().await.ingest(r);
}

async fn get(state: DashboardState, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = create_app(state);
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post(state: DashboardState, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = create_app(state);
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// All GET endpoints return 200 for a known machine.
#[tokio::test]
async fn test_get_endpoints_return_200() {
    let endpoints = [
        "/health".to_string(),
        "/api/v1/status".to_string(),
        format!("/api/v1/telemetry/{MACHINE}"),
        format!("/api/v1/telemetry/{MACHINE}/latest"),
        format!("/api/v1/logs/{MACHINE}"),
        "/api/v1/fleet".to_string(),
    ];

    for endpoint in &endpoints {
        let app = create_app(test_state(StubMode::Predicted));
        let resp = app
            .oneshot(
                Request::builder()
                    .uri(endpoint.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            resp.status().is_success(),
            "GET {endpoint} returned status {}",
            resp.status()
        );
    }
}

/// Success responses carry the data/meta envelope.
#[tokio::test]
async fn test_success_envelope_shape() {
    let (status, json) = get(test_state(StubMode::Predicted), "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.get("data").is_some());
    assert_eq!(json["meta"]["version"], "1");
    assert_eq!(json["data"]["machines"].as_array().unwrap().len(), 8);
}

/// Unknown machines return 404 with the error envelope.
#[tokio::test]
async fn test_unknown_machine_is_404() {
    let (status, json) = get(
        test_state(StubMode::Predicted),
        "/api/v1/telemetry/NOT-A-MACHINE",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("NOT-A-MACHINE"));
}

/// Telemetry view returns buffered readings oldest first.
#[tokio::test]
async fn test_telemetry_view_returns_buffered_readings() {
    let state = test_state(StubMode::Predicted);
    ingest(&state, MACHINE, reading(20.0)).await;
    ingest(&state, MACHINE, reading(21.0)).await;

    let (status, json) = get(state, &format!("/api/v1/telemetry/{MACHINE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["count"], 2);
    let data = json["data"]["data"].as_array().unwrap();
    assert_eq!(data[0]["vibration_rms"], 20.0);
    assert_eq!(data[1]["vibration_rms"], 21.0);
}

/// Latest telemetry is null before any reading arrives.
#[tokio::test]
async fn test_latest_is_null_before_first_reading() {
    let (status, json) = get(
        test_state(StubMode::Predicted),
        &format!("/api/v1/telemetry/{MACHINE}/latest"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["reading"].is_null());
}

/// An anomalous reading produces exactly one console log entry, and
/// recalibration resets the status.
#[tokio::test]
async fn test_escalation_then_recalibrate_flow() {
    let state = test_state(StubMode::Predicted);
    ingest(&state, MACHINE, reading(60.0)).await;

    let (_, logs) = get(state.clone(), &format!("/api/v1/logs/{MACHINE}")).await;
    let console = logs["data"]["console"].as_array().unwrap();
    assert_eq!(console.len(), 1);
    assert!(console[0]["message"]
        .as_str()
        .unwrap()
        .contains("DEGRADED"));

    let (status, json) = post(state.clone(), &format!("/api/v1/recalibrate/{MACHINE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "nominal");

    // Recalibration itself is logged
    let (_, logs) = get(state, &format!("/api/v1/logs/{MACHINE}")).await;
    let console = logs["data"]["console"].as_array().unwrap();
    assert_eq!(console.len(), 2);
}

/// A model response comes back tagged "predicted".
#[tokio::test]
async fn test_predict_returns_model_result() {
    let state = test_state(StubMode::Predicted);
    ingest(&state, MACHINE, reading(20.0)).await;

    let (status, json) = post(state, &format!("/api/v1/predict/{MACHINE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["outcome"], "predicted");
    assert_eq!(json["data"]["risk_level"], "high");
}

/// Service unreachable degrades to the fallback, still a 200.
#[tokio::test]
async fn test_predict_fallback_is_200_and_logged() {
    let state = test_state(StubMode::Fallback);
    ingest(&state, MACHINE, reading(20.0)).await;

    let (status, json) = post(state.clone(), &format!("/api/v1/predict/{MACHINE}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["outcome"], "fallback");

    let (_, logs) = get(state, &format!("/api/v1/logs/{MACHINE}")).await;
    let console = logs["data"]["console"].as_array().unwrap();
    assert!(console
        .iter()
        .any(|e| e["message"].as_str().unwrap().contains("fallback")));
}

/// Structured service errors surface verbatim as 422.
#[tokio::test]
async fn test_predict_service_error_surfaces_verbatim() {
    let state = test_state(StubMode::ServiceError);
    ingest(&state, MACHINE, reading(20.0)).await;

    let (status, json) = post(state, &format!("/api/v1/predict/{MACHINE}")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "INVALID_FEATURE");
    assert_eq!(json["error"]["message"], "vibration_rms out of range");
}

/// Predicting before any telemetry is a 422, not a panic or a fallback.
#[tokio::test]
async fn test_predict_without_telemetry_is_422() {
    let (status, json) = post(
        test_state(StubMode::Predicted),
        &format!("/api/v1/predict/{MACHINE}"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "NO_TELEMETRY");
}
