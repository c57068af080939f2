//! Telemetry reading types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One telemetry sample for a single machine.
///
/// Produced once per tick by the reading generator (or received from the
/// telemetry service). Immutable after creation; retained in a bounded
/// rolling buffer owned by the machine's session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub timestamp: DateTime<Utc>,

    /// RMS vibration (mm/s)
    pub vibration_rms: f64,
    /// Peak vibration amplitude (mm/s)
    pub vibration_peak: f64,
    /// Vibration kurtosis - elevated values indicate bearing wear
    pub vibration_kurtosis: f64,
    /// Spindle temperature (°C)
    pub temperature: f64,
    /// Power draw (kW)
    pub power_consumption: f64,
    /// Set when the sample was drawn from the anomaly distribution
    #[serde(default)]
    pub anomaly_flag: bool,
}

impl TelemetryReading {
    /// Deviation of power draw from the assumed 12 kW baseline (%).
    pub fn power_deviation(&self, baseline_kw: f64) -> f64 {
        if baseline_kw.abs() < f64::EPSILON {
            return 0.0;
        }
        (self.power_consumption - baseline_kw) / baseline_kw * 100.0
    }
}
