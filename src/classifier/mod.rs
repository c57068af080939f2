//! Threshold Classifier - pure, deterministic band classification.
//!
//! Maps a telemetry reading (per-channel) or an aggregate 0-100 health
//! score (fleet-level, five bands) to a discrete tier using the configured
//! numeric bands. Same input always yields the same tier; no hidden state.
//!
//! Boundary rule: a value exactly on a threshold belongs to the
//! higher-severity band. For sensor channels that means `value >= warning`
//! is already Warning; for health scores it means a score exactly on a cut
//! falls into the more severe (lower) band, so `h = 50.0` classifies as
//! Degraded.

use crate::config::ClassifierBands;
use crate::types::{HealthStatus, TelemetryReading};

/// Severity tier for a single sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Normal,
    Warning,
    Critical,
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityTier::Normal => write!(f, "normal"),
            SeverityTier::Warning => write!(f, "warning"),
            SeverityTier::Critical => write!(f, "critical"),
        }
    }
}

/// The channel that breached and the value that triggered it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Breach {
    pub channel: &'static str,
    pub value: f64,
    pub threshold: f64,
    pub tier: SeverityTier,
}

impl std::fmt::Display for Breach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} at {:.1} (threshold {:.1})",
            self.channel, self.tier, self.value, self.threshold
        )
    }
}

/// Pure classification over the configured bands.
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    bands: ClassifierBands,
}

impl ThresholdClassifier {
    pub fn new(bands: ClassifierBands) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &ClassifierBands {
        &self.bands
    }

    /// Classify RMS vibration against the warning/critical bands.
    pub fn classify_vibration(&self, rms: f64) -> SeverityTier {
        if rms >= self.bands.vibration_critical {
            SeverityTier::Critical
        } else if rms >= self.bands.vibration_warning {
            SeverityTier::Warning
        } else {
            SeverityTier::Normal
        }
    }

    /// Classify temperature against the warning/critical bands.
    pub fn classify_temperature(&self, temp: f64) -> SeverityTier {
        if temp >= self.bands.temperature_critical {
            SeverityTier::Critical
        } else if temp >= self.bands.temperature_warning {
            SeverityTier::Warning
        } else {
            SeverityTier::Normal
        }
    }

    /// Kurtosis above the elevated cutoff indicates bearing-health risk.
    pub fn kurtosis_elevated(&self, kurtosis: f64) -> bool {
        kurtosis > self.bands.kurtosis_elevated
    }

    /// Classify a whole reading, returning the worst breach if any channel
    /// is outside its normal band.
    ///
    /// Channel priority when tiers are equal: vibration, then temperature,
    /// then kurtosis (vibration is the primary failure signature).
    pub fn classify_reading(&self, reading: &TelemetryReading) -> Option<Breach> {
        let mut worst: Option<Breach> = None;

        let vibration_tier = self.classify_vibration(reading.vibration_rms);
        if vibration_tier > SeverityTier::Normal {
            let threshold = if vibration_tier == SeverityTier::Critical {
                self.bands.vibration_critical
            } else {
                self.bands.vibration_warning
            };
            worst = Some(Breach {
                channel: "vibration_rms",
                value: reading.vibration_rms,
                threshold,
                tier: vibration_tier,
            });
        }

        let temp_tier = self.classify_temperature(reading.temperature);
        if temp_tier > worst.as_ref().map_or(SeverityTier::Normal, |b| b.tier) {
            let threshold = if temp_tier == SeverityTier::Critical {
                self.bands.temperature_critical
            } else {
                self.bands.temperature_warning
            };
            worst = Some(Breach {
                channel: "temperature",
                value: reading.temperature,
                threshold,
                tier: temp_tier,
            });
        }

        if worst.is_none() && self.kurtosis_elevated(reading.vibration_kurtosis) {
            worst = Some(Breach {
                channel: "vibration_kurtosis",
                value: reading.vibration_kurtosis,
                threshold: self.bands.kurtosis_elevated,
                tier: SeverityTier::Warning,
            });
        }

        worst
    }

    /// Classify a 0-100 health score into the five fleet bands.
    ///
    /// NaN is treated as Critical: a score that cannot be computed is not
    /// evidence of health.
    pub fn classify_health(&self, score: f64) -> HealthStatus {
        if score.is_nan() || score <= self.bands.health_cut_critical {
            HealthStatus::Critical
        } else if score <= self.bands.health_cut_degraded {
            HealthStatus::Degraded
        } else if score <= self.bands.health_cut_moderate {
            HealthStatus::Moderate
        } else if score <= self.bands.health_cut_good {
            HealthStatus::Good
        } else {
            HealthStatus::Optimal
        }
    }
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self::new(ClassifierBands::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(rms: f64, temp: f64, kurtosis: f64) -> TelemetryReading {
        TelemetryReading {
            timestamp: Utc::now(),
            vibration_rms: rms,
            vibration_peak: rms * 1.7,
            vibration_kurtosis: kurtosis,
            temperature: temp,
            power_consumption: 12.0,
            anomaly_flag: false,
        }
    }

    #[test]
    fn test_vibration_boundaries_go_to_higher_severity() {
        let c = ThresholdClassifier::default();
        assert_eq!(c.classify_vibration(29.9), SeverityTier::Normal);
        assert_eq!(c.classify_vibration(30.0), SeverityTier::Warning);
        assert_eq!(c.classify_vibration(49.9), SeverityTier::Warning);
        assert_eq!(c.classify_vibration(50.0), SeverityTier::Critical);
    }

    #[test]
    fn test_temperature_boundaries() {
        let c = ThresholdClassifier::default();
        assert_eq!(c.classify_temperature(54.9), SeverityTier::Normal);
        assert_eq!(c.classify_temperature(55.0), SeverityTier::Warning);
        assert_eq!(c.classify_temperature(65.0), SeverityTier::Critical);
    }

    #[test]
    fn test_health_bands_and_boundary_rule() {
        let c = ThresholdClassifier::default();
        assert_eq!(c.classify_health(0.0), HealthStatus::Critical);
        assert_eq!(c.classify_health(25.0), HealthStatus::Critical);
        assert_eq!(c.classify_health(25.1), HealthStatus::Degraded);
        assert_eq!(c.classify_health(50.0), HealthStatus::Degraded);
        assert_eq!(c.classify_health(69.9), HealthStatus::Moderate);
        assert_eq!(c.classify_health(70.0), HealthStatus::Moderate);
        assert_eq!(c.classify_health(90.0), HealthStatus::Good);
        assert_eq!(c.classify_health(90.1), HealthStatus::Optimal);
        assert_eq!(c.classify_health(100.0), HealthStatus::Optimal);
    }

    #[test]
    fn test_health_classification_is_deterministic_and_monotonic() {
        let c = ThresholdClassifier::default();
        // Repeated calls on a boundary value agree
        let first = c.classify_health(50.0);
        for _ in 0..100 {
            assert_eq!(c.classify_health(50.0), first);
        }
        // Severity never increases as the score rises
        let mut previous = c.classify_health(0.0);
        let mut h = 0.0;
        while h <= 100.0 {
            let current = c.classify_health(h);
            assert!(current <= previous, "severity increased at h={h}");
            previous = current;
            h += 0.5;
        }
    }

    #[test]
    fn test_classify_reading_picks_worst_channel() {
        let c = ThresholdClassifier::default();
        // Vibration warning + temperature critical -> temperature wins
        let breach = c.classify_reading(&reading(35.0, 70.0, 3.0)).unwrap();
        assert_eq!(breach.channel, "temperature");
        assert_eq!(breach.tier, SeverityTier::Critical);
    }

    #[test]
    fn test_vibration_wins_ties() {
        let c = ThresholdClassifier::default();
        let breach = c.classify_reading(&reading(35.0, 58.0, 3.0)).unwrap();
        assert_eq!(breach.channel, "vibration_rms");
    }

    #[test]
    fn test_kurtosis_alone_is_a_warning() {
        let c = ThresholdClassifier::default();
        let breach = c.classify_reading(&reading(20.0, 44.0, 4.5)).unwrap();
        assert_eq!(breach.channel, "vibration_kurtosis");
        assert_eq!(breach.tier, SeverityTier::Warning);
        // Exactly 4.0 is not elevated (strict >)
        assert!(c.classify_reading(&reading(20.0, 44.0, 4.0)).is_none());
    }

    #[test]
    fn test_nominal_reading_has_no_breach() {
        let c = ThresholdClassifier::default();
        assert!(c.classify_reading(&reading(20.0, 44.0, 3.2)).is_none());
    }
}
