//! Reading Generator - synthetic per-tick telemetry for a single machine.
//!
//! Baseline values follow a bounded random walk around machine-nominal
//! means; temperature drifts slowly while vibration and power stay near
//! their baselines. With a small fixed probability per tick the vibration
//! channels are instead drawn from an elevated anomaly distribution and
//! the reading is flagged.
//!
//! Pure per-tick computation, no blocking. Seedable for reproducible runs.

use chrono::Utc;
use rand::prelude::*;
use rand_distr::{Distribution, Normal, Uniform};

use crate::config::defaults::{
    ANOMALY_PROBABILITY, NOMINAL_KURTOSIS, NOMINAL_POWER_KW, NOMINAL_TEMPERATURE,
    NOMINAL_VIBRATION_PEAK, NOMINAL_VIBRATION_RMS,
};
use crate::types::TelemetryReading;

/// Machine-specific nominal operating point.
#[derive(Debug, Clone)]
pub struct MachineBaseline {
    pub vibration_rms: f64,
    pub vibration_peak: f64,
    pub kurtosis: f64,
    pub temperature: f64,
    pub power_kw: f64,
    /// Per-tick anomaly injection probability
    pub anomaly_probability: f64,
}

impl Default for MachineBaseline {
    fn default() -> Self {
        Self {
            vibration_rms: NOMINAL_VIBRATION_RMS,
            vibration_peak: NOMINAL_VIBRATION_PEAK,
            kurtosis: NOMINAL_KURTOSIS,
            temperature: NOMINAL_TEMPERATURE,
            power_kw: NOMINAL_POWER_KW,
            anomaly_probability: ANOMALY_PROBABILITY,
        }
    }
}

/// Per-machine synthetic telemetry source.
pub struct ReadingGenerator {
    rng: StdRng,
    baseline: MachineBaseline,
    /// Slow temperature drift, bounded to ±3 °C around nominal
    temp_drift: f64,
    readings_generated: u64,
    anomalies_injected: u64,

    vib_noise: Normal<f64>,
    peak_noise: Normal<f64>,
    kurtosis_noise: Normal<f64>,
    power_noise: Normal<f64>,
    drift_step: Normal<f64>,
}

impl ReadingGenerator {
    /// Create a generator with the default baseline.
    ///
    /// `seed` fixes the random sequence for reproducible test runs; `None`
    /// seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_baseline(MachineBaseline::default(), seed)
    }

    pub fn with_baseline(baseline: MachineBaseline, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        // Normal::new only fails on non-finite/negative sigma
        #[allow(clippy::unwrap_used)]
        Self {
            rng,
            baseline,
            temp_drift: 0.0,
            readings_generated: 0,
            anomalies_injected: 0,
            vib_noise: Normal::new(0.0, 1.5).unwrap(),
            peak_noise: Normal::new(0.0, 4.0).unwrap(),
            kurtosis_noise: Normal::new(0.0, 0.2).unwrap(),
            power_noise: Normal::new(0.0, 0.3).unwrap(),
            drift_step: Normal::new(0.0, 0.15).unwrap(),
        }
    }

    /// Produce exactly one reading for this tick.
    pub fn next_reading(&mut self) -> TelemetryReading {
        self.readings_generated += 1;

        // Temperature random-walks slowly, bounded around nominal.
        self.temp_drift =
            (self.temp_drift + self.drift_step.sample(&mut self.rng)).clamp(-3.0, 3.0);
        let temperature = self.baseline.temperature + self.temp_drift;

        let is_anomaly = self.rng.gen::<f64>() < self.baseline.anomaly_probability;

        let (vibration_rms, vibration_peak, vibration_kurtosis) = if is_anomaly {
            self.anomalies_injected += 1;
            self.anomalous_vibration()
        } else {
            (
                (self.baseline.vibration_rms + self.vib_noise.sample(&mut self.rng)).max(0.0),
                (self.baseline.vibration_peak + self.peak_noise.sample(&mut self.rng)).max(0.0),
                (self.baseline.kurtosis + self.kurtosis_noise.sample(&mut self.rng)).max(2.0),
            )
        };

        TelemetryReading {
            timestamp: Utc::now(),
            vibration_rms,
            vibration_peak,
            vibration_kurtosis,
            temperature,
            power_consumption: (self.baseline.power_kw + self.power_noise.sample(&mut self.rng))
                .max(0.0),
            anomaly_flag: is_anomaly,
        }
    }

    /// Elevated vibration draw: rms ~55 + U(-10, 25), peak ~80 + U(0, 30),
    /// kurtosis ~6 + U(0, 3).
    fn anomalous_vibration(&mut self) -> (f64, f64, f64) {
        let (rms_spread, peak_spread, kurt_spread) = (
            Uniform::new(-10.0, 25.0),
            Uniform::new(0.0, 30.0),
            Uniform::new(0.0, 3.0),
        );
        (
            55.0 + rms_spread.sample(&mut self.rng),
            80.0 + peak_spread.sample(&mut self.rng),
            6.0 + kurt_spread.sample(&mut self.rng),
        )
    }

    pub fn readings_generated(&self) -> u64 {
        self.readings_generated
    }

    pub fn anomalies_injected(&self) -> u64 {
        self.anomalies_injected
    }
}
