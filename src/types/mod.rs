//! Core domain types for the AegisOps machine monitor.

pub mod health;
pub mod log;
pub mod prediction;
pub mod telemetry;

pub use health::{FleetSummary, HealthStatus, MachineStatus, SystemStatus};
pub use log::{LogEntry, LogLevel};
pub use prediction::{
    Explanation, FeatureVector, PredictionOutcome, PredictionResult, RiskLevel, ServiceError,
    ServiceErrorCode,
};
pub use telemetry::TelemetryReading;
