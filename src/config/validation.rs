//! Config validation: physical range and ordering checks.
//!
//! Warnings never break a config - they are logged at load time so an
//! operator typo (inverted bands, zero-capacity buffer) is visible instead
//! of silently producing a monitor that can never alert.

use super::MonitorConfig;

/// A non-fatal config warning.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn warn_on(warnings: &mut Vec<ValidationWarning>, cond: bool, field: &str, message: String) {
    if cond {
        warnings.push(ValidationWarning {
            field: field.to_string(),
            message,
        });
    }
}

/// Check a loaded config for suspicious values.
pub fn validate(config: &MonitorConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let b = &config.bands;

    warn_on(
        &mut warnings,
        b.vibration_warning >= b.vibration_critical,
        "bands.vibration_warning",
        format!(
            "vibration_warning ({}) should be below vibration_critical ({})",
            b.vibration_warning, b.vibration_critical
        ),
    );
    warn_on(
        &mut warnings,
        b.temperature_warning >= b.temperature_critical,
        "bands.temperature_warning",
        format!(
            "temperature_warning ({}) should be below temperature_critical ({})",
            b.temperature_warning, b.temperature_critical
        ),
    );

    let cuts_ordered = b.health_cut_critical < b.health_cut_degraded
        && b.health_cut_degraded < b.health_cut_moderate
        && b.health_cut_moderate < b.health_cut_good;
    warn_on(
        &mut warnings,
        !cuts_ordered,
        "bands.health_cut_critical",
        format!(
            "health score cuts must be strictly increasing (got {}/{}/{}/{})",
            b.health_cut_critical, b.health_cut_degraded, b.health_cut_moderate, b.health_cut_good
        ),
    );
    warn_on(
        &mut warnings,
        b.health_cut_good > 100.0 || b.health_cut_critical < 0.0,
        "bands.health_cut_good",
        "health score cuts must lie within 0-100".to_string(),
    );

    warn_on(
        &mut warnings,
        config.buffers.reading_capacity == 0,
        "buffers.reading_capacity",
        "reading_capacity of 0 retains no telemetry".to_string(),
    );
    warn_on(
        &mut warnings,
        config.buffers.console_log_capacity == 0 || config.buffers.full_log_capacity == 0,
        "buffers.console_log_capacity",
        "log capacities of 0 drop every alert".to_string(),
    );
    warn_on(
        &mut warnings,
        config.intervals.console_tick_secs == 0,
        "intervals.console_tick_secs",
        "console_tick_secs of 0 would spin the sampler".to_string(),
    );
    warn_on(
        &mut warnings,
        config.fleet.machines.is_empty(),
        "fleet.machines",
        "fleet roster is empty - nothing will be monitored".to_string(),
    );

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        assert!(validate(&MonitorConfig::default()).is_empty());
    }

    #[test]
    fn test_inverted_bands_warn() {
        let mut config = MonitorConfig::default();
        config.bands.vibration_warning = 60.0; // above critical (50)
        let warnings = validate(&config);
        assert!(warnings
            .iter()
            .any(|w| w.field == "bands.vibration_warning"));
    }

    #[test]
    fn test_zero_capacity_warns() {
        let mut config = MonitorConfig::default();
        config.buffers.reading_capacity = 0;
        assert!(!validate(&config).is_empty());
    }
}
