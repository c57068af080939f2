//! Health and status types: HealthStatus, SystemStatus, MachineStatus, FleetSummary
//!
//! Two tier vocabularies exist side by side and are deliberately kept
//! distinct (no mapping between them):
//! - [`SystemStatus`] - 3-tier, per active asset, driven by the anomaly
//!   state machine and operator recalibration.
//! - [`HealthStatus`] - 5-tier, fleet-level, a pure function of the
//!   0-100 health score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Fleet-Level Health (5-tier)
// ============================================================================

/// Five-tier machine condition band, derived from the 0-100 health score.
///
/// Ordering follows severity: `Optimal < Good < Moderate < Degraded < Critical`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// 90-100: optimal condition
    Optimal,
    /// 70-89: good condition, minor wear
    Good,
    /// 50-69: moderate wear, schedule maintenance
    Moderate,
    /// 25-49: degraded, maintenance required
    Degraded,
    /// 0-24: critical, immediate attention
    Critical,
}

impl HealthStatus {
    /// Short code for logging
    pub fn short_code(&self) -> &'static str {
        match self {
            HealthStatus::Optimal => "OPT",
            HealthStatus::Good => "GOOD",
            HealthStatus::Moderate => "MOD",
            HealthStatus::Degraded => "DEGR",
            HealthStatus::Critical => "CRIT",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Optimal => write!(f, "optimal"),
            HealthStatus::Good => write!(f, "good"),
            HealthStatus::Moderate => write!(f, "moderate"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Critical => write!(f, "critical"),
        }
    }
}

// ============================================================================
// Single-Asset Status (3-tier)
// ============================================================================

/// Operational status of the single asset under live monitoring.
///
/// Escalates Nominal -> Degraded on the first anomalous reading and stays
/// there: there is no automatic recovery as readings normalize (alerts
/// require acknowledgment). Only an explicit operator recalibration returns
/// the status to Nominal. `Critical` is part of the operator-facing
/// vocabulary; no automatic transition produces it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    #[default]
    Nominal,
    Degraded,
    Critical,
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemStatus::Nominal => write!(f, "NOMINAL"),
            SystemStatus::Degraded => write!(f, "DEGRADED"),
            SystemStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ============================================================================
// Machine Status (fleet view entry)
// ============================================================================

/// Per-machine entry in the fleet health view.
///
/// `status` is always derived from `health_score` by the classifier; the
/// two must never disagree. Construct via [`MachineStatus::new`] to keep
/// that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineStatus {
    pub machine_id: String,
    /// Composite condition indicator, 0-100, higher is healthier
    pub health_score: f64,
    pub status: HealthStatus,
    pub location: String,
    /// Most recent alert time, if health has dropped to 70 or below
    pub last_alert: Option<DateTime<Utc>>,
}

impl MachineStatus {
    /// Build a status entry, deriving the band from the score.
    pub fn new(
        machine_id: impl Into<String>,
        health_score: f64,
        location: impl Into<String>,
        classify: impl Fn(f64) -> HealthStatus,
    ) -> Self {
        let status = classify(health_score);
        Self {
            machine_id: machine_id.into(),
            health_score,
            status,
            location: location.into(),
            last_alert: if health_score <= 70.0 {
                Some(Utc::now())
            } else {
                None
            },
        }
    }
}

// ============================================================================
// Fleet Summary
// ============================================================================

/// Aggregated band counts across the fleet.
///
/// Invariant: `optimal + good + moderate + degraded + critical == total_machines`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FleetSummary {
    pub total_machines: usize,
    pub optimal: usize,
    pub good: usize,
    pub moderate: usize,
    pub degraded: usize,
    pub critical: usize,
    pub average_health: f64,
}

impl FleetSummary {
    /// Sum of all band counts - must equal `total_machines`.
    pub fn band_total(&self) -> usize {
        self.optimal + self.good + self.moderate + self.degraded + self.critical
    }
}
