//! HTTP client for the external prediction service.
//!
//! `POST /predict` with the feature vector; the response is either a
//! [`PredictionResult`] or a structured error envelope. A transport failure
//! never reaches the caller as an error - it degrades to the fixed
//! manual-override fallback, tagged so the view can tell the two apart.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::config::defaults::{PREDICTION_FALLBACK_NOTICE, PREDICTION_HTTP_TIMEOUT_SECS};
use crate::types::prediction::ServiceErrorEnvelope;
use crate::types::{FeatureVector, PredictionOutcome, PredictionResult, RiskLevel, ServiceError};

/// Prediction client errors.
///
/// Only `Service` (a structured error from the model service, e.g.
/// INVALID_FEATURE) is surfaced to the caller; transport-level failures are
/// absorbed into the fallback outcome.
#[derive(Debug, thiserror::Error)]
pub enum PredictionClientError {
    #[error("prediction service error {}: {}", .0.code, .0.message)]
    Service(ServiceError),
    #[error("malformed response from prediction service: {0}")]
    MalformedResponse(String),
}

/// Abstraction over the prediction backend so views and tests can swap in
/// a stub without a network.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Issue one prediction request.
    ///
    /// Ok(Predicted) for a model response, Ok(Fallback) when the service is
    /// unreachable, Err only for structured service errors that must be
    /// displayed verbatim.
    async fn request_prediction(
        &self,
        machine_id: &str,
        features: &FeatureVector,
    ) -> Result<PredictionOutcome, PredictionClientError>;
}

/// The deterministic result substituted when the service is unreachable.
pub fn fallback_result(machine_id: &str) -> PredictionResult {
    PredictionResult {
        prediction_id: format!("fallback-{}", Uuid::new_v4()),
        machine_id: machine_id.to_string(),
        timestamp: Utc::now(),
        risk_score: 0.0,
        failure_probability: 0.0,
        risk_level: RiskLevel::Low,
        recommended_action: PREDICTION_FALLBACK_NOTICE.to_string(),
        confidence: 0.0,
        explanation: None,
    }
}

/// Wire request body for `POST /predict`.
#[derive(Debug, serde::Serialize)]
struct PredictRequestBody<'a> {
    machine_id: &'a str,
    features: &'a FeatureVector,
}

/// reqwest-backed client for the real service.
#[derive(Clone)]
pub struct HttpPredictionService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPredictionService {
    /// Create a client for the service at `base_url` (no trailing slash
    /// needed).
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(PREDICTION_HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn request_prediction(
        &self,
        machine_id: &str,
        features: &FeatureVector,
    ) -> Result<PredictionOutcome, PredictionClientError> {
        let body = PredictRequestBody {
            machine_id,
            features,
        };

        let response = match self
            .http
            .post(format!("{}/predict", self.base_url))
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                // Transport failure: substitute the fallback, do not retry.
                tracing::warn!(machine = machine_id, error = %e, "Prediction service unreachable, using fallback");
                return Ok(PredictionOutcome::Fallback(fallback_result(machine_id)));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(machine = machine_id, error = %e, "Prediction response aborted, using fallback");
                return Ok(PredictionOutcome::Fallback(fallback_result(machine_id)));
            }
        };

        if status.is_success() {
            let result: PredictionResult = serde_json::from_slice(&bytes)
                .map_err(|e| PredictionClientError::MalformedResponse(e.to_string()))?;
            return Ok(PredictionOutcome::Predicted(result));
        }

        // Non-2xx: expect the structured error envelope and surface it
        // verbatim. Anything else is a malformed response.
        match serde_json::from_slice::<ServiceErrorEnvelope>(&bytes) {
            Ok(envelope) => Err(PredictionClientError::Service(envelope.error)),
            Err(_) => Err(PredictionClientError::MalformedResponse(format!(
                "status {status} with unrecognized body"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_text_is_deterministic() {
        let a = fallback_result("CNC-ALPHA-921");
        let b = fallback_result("CNC-ALPHA-921");
        assert_eq!(a.recommended_action, b.recommended_action);
        assert_eq!(a.recommended_action, PREDICTION_FALLBACK_NOTICE);
        assert_eq!(a.confidence, 0.0);
        assert_eq!(a.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_fallback_not_error() {
        // Nothing listens on this port.
        let client = HttpPredictionService::new("http://127.0.0.1:1/api/v1").unwrap();
        let features = FeatureVector {
            vibration_rms: 20.0,
            vibration_peak: 35.0,
            vibration_kurtosis: 3.2,
            temperature: 44.0,
            temp_rate_of_change: 0.0,
            power_consumption: 12.0,
            power_deviation: 0.0,
            time_since_maintenance: 340.0,
            cumulative_cycles: 128_450,
        };

        let outcome = client
            .request_prediction("CNC-ALPHA-921", &features)
            .await
            .unwrap();
        assert!(outcome.is_fallback());
        assert_eq!(
            outcome.result().recommended_action,
            PREDICTION_FALLBACK_NOTICE
        );
    }
}
