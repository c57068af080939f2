//! System-wide default constants.
//!
//! Centralises the magic numbers of the monitor so each one has a single
//! named home. Grouped by subsystem.

// ============================================================================
// Telemetry Generation
// ============================================================================

/// Nominal RMS vibration (mm/s) for a healthy machine.
pub const NOMINAL_VIBRATION_RMS: f64 = 20.0;

/// Nominal peak vibration amplitude (mm/s).
pub const NOMINAL_VIBRATION_PEAK: f64 = 35.0;

/// Nominal vibration kurtosis (a healthy bearing sits near 3.2).
pub const NOMINAL_KURTOSIS: f64 = 3.2;

/// Nominal spindle temperature (°C).
pub const NOMINAL_TEMPERATURE: f64 = 44.0;

/// Nominal power draw (kW). Also the baseline for power deviation.
pub const NOMINAL_POWER_KW: f64 = 12.0;

/// Probability per tick that the generator injects an anomalous sample.
pub const ANOMALY_PROBABILITY: f64 = 0.02;

// ============================================================================
// Buffers
// ============================================================================

/// Rolling telemetry buffer capacity per machine (readings).
///
/// 100 readings at the 3 s console tick = 5 minutes of context.
pub const READING_BUFFER_CAPACITY: usize = 100;

/// Alert log capacity for the live console view.
pub const CONSOLE_LOG_CAPACITY: usize = 15;

/// Alert log capacity for the full log view.
pub const FULL_LOG_CAPACITY: usize = 100;

// ============================================================================
// Timers
// ============================================================================

/// Console sampling tick interval (seconds).
pub const CONSOLE_TICK_SECS: u64 = 3;

/// Live telemetry "latest" poll interval (seconds).
pub const LATEST_POLL_SECS: u64 = 2;

/// Fleet summary refresh interval (seconds).
pub const FLEET_REFRESH_SECS: u64 = 10;

// ============================================================================
// Classification Bands
// ============================================================================

/// RMS vibration warning threshold (mm/s).
pub const VIBRATION_WARNING: f64 = 30.0;

/// RMS vibration critical threshold (mm/s).
pub const VIBRATION_CRITICAL: f64 = 50.0;

/// Temperature warning threshold (°C).
pub const TEMPERATURE_WARNING: f64 = 55.0;

/// Temperature critical threshold (°C).
pub const TEMPERATURE_CRITICAL: f64 = 65.0;

/// Kurtosis above this indicates bearing-health risk.
pub const KURTOSIS_ELEVATED: f64 = 4.0;

/// Health score cut points (higher score is healthier).
/// A score exactly on a cut belongs to the more severe band.
pub const HEALTH_CUT_CRITICAL: f64 = 25.0;
pub const HEALTH_CUT_DEGRADED: f64 = 50.0;
pub const HEALTH_CUT_MODERATE: f64 = 70.0;
pub const HEALTH_CUT_GOOD: f64 = 90.0;

// ============================================================================
// Prediction Adapter
// ============================================================================

/// HTTP client timeout for prediction service requests (seconds).
pub const PREDICTION_HTTP_TIMEOUT_SECS: u64 = 30;

/// Assumed hours since last preventive maintenance when no maintenance
/// system is connected.
pub const ASSUMED_TIME_SINCE_MAINTENANCE_HOURS: f64 = 340.0;

/// Assumed cumulative cycles since overhaul when no MES is connected.
pub const ASSUMED_CUMULATIVE_CYCLES: u64 = 128_450;

/// Fixed user-visible notice substituted when the prediction service is
/// unreachable.
pub const PREDICTION_FALLBACK_NOTICE: &str =
    "Prediction service unreachable - manual override in effect. \
     Follow standard preventive maintenance schedule until connectivity is restored.";
