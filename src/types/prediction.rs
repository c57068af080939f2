//! Prediction service contract types
//!
//! Request/response shapes for the external failure-prediction service
//! (`POST /predict`). The service itself is an external collaborator; only
//! its wire contract lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Feature Vector
// ============================================================================

/// Input features for a prediction request.
///
/// Built from the latest telemetry reading plus derived values (temperature
/// slope over the buffer, power deviation from baseline) and operational
/// context assumed by the console (hours since PM, cumulative cycles).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// RMS vibration (mm/s)
    pub vibration_rms: f64,
    /// Peak vibration amplitude
    pub vibration_peak: f64,
    /// Vibration kurtosis
    pub vibration_kurtosis: f64,
    /// Component temperature (°C)
    pub temperature: f64,
    /// Temperature gradient (°C/min)
    pub temp_rate_of_change: f64,
    /// Power draw (kW)
    pub power_consumption: f64,
    /// Deviation from baseline (%)
    pub power_deviation: f64,
    /// Hours since last preventive maintenance
    pub time_since_maintenance: f64,
    /// Total cycles since overhaul
    pub cumulative_cycles: u64,
}

// ============================================================================
// Result
// ============================================================================

/// Risk band returned by the prediction service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Model explanation attached to a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Per-feature contribution to the risk score
    pub feature_contributions: BTreeMap<String, f64>,
    /// Human-readable top contributing factors
    pub top_factors: Vec<String>,
    /// Plain-language summary for operations staff
    pub natural_language: String,
}

/// Parsed prediction response.
///
/// Immutable; created per request and not persisted beyond the current view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction_id: String,
    pub machine_id: String,
    pub timestamp: DateTime<Utc>,
    /// Risk score 0-100
    pub risk_score: f64,
    /// P(failure) in the next 72h, 0-1
    pub failure_probability: f64,
    pub risk_level: RiskLevel,
    pub recommended_action: String,
    /// Model confidence, 0-1
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

/// Outcome of a prediction request.
///
/// The caller must be able to distinguish a real model response from the
/// fixed fallback substituted when the service is unreachable; the two are
/// never mixed silently.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PredictionOutcome {
    /// The service responded with a result
    Predicted(PredictionResult),
    /// Service unreachable - deterministic manual-override notice shown
    Fallback(PredictionResult),
}

impl PredictionOutcome {
    pub fn result(&self) -> &PredictionResult {
        match self {
            PredictionOutcome::Predicted(r) | PredictionOutcome::Fallback(r) => r,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PredictionOutcome::Fallback(_))
    }
}

// ============================================================================
// Service Error Envelope
// ============================================================================

/// Error codes the prediction service may return in its error envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceErrorCode {
    InvalidFeature,
    MachineNotFound,
    ModelError,
    FeatureStale,
    RateLimited,
}

impl std::fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceErrorCode::InvalidFeature => write!(f, "INVALID_FEATURE"),
            ServiceErrorCode::MachineNotFound => write!(f, "MACHINE_NOT_FOUND"),
            ServiceErrorCode::ModelError => write!(f, "MODEL_ERROR"),
            ServiceErrorCode::FeatureStale => write!(f, "FEATURE_STALE"),
            ServiceErrorCode::RateLimited => write!(f, "RATE_LIMITED"),
        }
    }
}

/// Structured error returned by the service: `{"error": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    pub code: ServiceErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Wire wrapper for the error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorEnvelope {
    pub error: ServiceError,
}
