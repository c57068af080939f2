//! AegisOps: CNC Fleet Condition Monitoring
//!
//! Telemetry monitoring console for a machining fleet: synthetic sensor
//! acquisition, threshold-based anomaly classification, a latched
//! health-status state machine, bounded alert logs, and an adapter to the
//! external failure-prediction service.
//!
//! ## Architecture
//!
//! - **Generator**: seeded synthetic vibration/temperature/power readings
//! - **Classifier**: per-channel severity tiers plus the 0-100 health bands
//! - **Session**: per-machine state machine (buffer, status, alert logs)
//! - **Runtime**: cancellable periodic tasks driving every session
//! - **Prediction**: HTTP adapter with deterministic fallback
//! - **API**: Axum dashboard surface

pub mod alertlog;
pub mod api;
pub mod classifier;
pub mod config;
pub mod fleet;
pub mod generator;
pub mod prediction;
pub mod runtime;
pub mod session;
pub mod types;

// Re-export configuration
pub use config::MonitorConfig;

// Re-export commonly used types
pub use types::{
    FeatureVector, FleetSummary, HealthStatus, LogEntry, LogLevel, MachineStatus,
    PredictionOutcome, PredictionResult, RiskLevel, SystemStatus, TelemetryReading,
};

// Re-export the monitoring core
pub use classifier::{Breach, SeverityTier, ThresholdClassifier};
pub use generator::ReadingGenerator;
pub use session::{MonitorSession, TickOutcome};

// Re-export runtime and prediction entry points
pub use prediction::{HttpPredictionService, PredictionClientError, PredictionService};
pub use runtime::{composite_health, MonitorRuntime, RuntimeError};
