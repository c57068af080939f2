//! Feature vector assembly from session state.
//!
//! Mirrors the production feature store: latest raw channels, a
//! buffer-derived temperature slope, power deviation against the assumed
//! 12 kW baseline, and operational context the console has to assume
//! because no maintenance system or MES is connected.

use crate::config::defaults::{
    ASSUMED_CUMULATIVE_CYCLES, ASSUMED_TIME_SINCE_MAINTENANCE_HOURS, NOMINAL_POWER_KW,
};
use crate::session::MonitorSession;
use crate::types::FeatureVector;

/// Build the feature vector for a prediction request from the session's
/// latest reading. Returns `None` when no telemetry has been collected yet
/// (the view renders a placeholder and skips the request).
pub fn build_feature_vector(session: &MonitorSession) -> Option<FeatureVector> {
    let latest = session.latest_reading()?;

    Some(FeatureVector {
        vibration_rms: latest.vibration_rms,
        vibration_peak: latest.vibration_peak,
        vibration_kurtosis: latest.vibration_kurtosis,
        temperature: latest.temperature,
        // Slope is per reading; console ticks are 3 s, so scale to °C/min.
        temp_rate_of_change: session.temperature_slope() * 20.0,
        power_consumption: latest.power_consumption,
        power_deviation: latest.power_deviation(NOMINAL_POWER_KW),
        time_since_maintenance: ASSUMED_TIME_SINCE_MAINTENANCE_HOURS,
        cumulative_cycles: ASSUMED_CUMULATIVE_CYCLES,
    })
}
