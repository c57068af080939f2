//! Per-machine monitoring session: bounded reading buffer plus the
//! health-status state machine.
//!
//! One session owns all mutable state for one machine - no cross-machine
//! sharing. Each tick runs generate -> classify -> possibly transition ->
//! possibly log to completion before the next tick's work begins.
//!
//! Escalation policy: the first anomalous reading while Nominal moves the
//! status to Degraded and emits exactly one log entry naming the breach.
//! Further anomalies while non-nominal are idempotent, and the status never
//! decays back as readings normalize - alerts require acknowledgment, so
//! recovery happens only through the explicit recalibrate action. This is
//! a deliberate anti-flapping policy, not a bug.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::alertlog::AlertLog;
use crate::classifier::{Breach, SeverityTier, ThresholdClassifier};
use crate::config::MonitorConfig;
use crate::generator::ReadingGenerator;
use crate::types::{LogLevel, SystemStatus, TelemetryReading};

/// What a single tick did, for callers that need to react (logging, UI push).
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub reading: TelemetryReading,
    /// Breach detected by the classifier this tick, if any
    pub breach: Option<Breach>,
    /// Set when this tick escalated the system status
    pub escalated: bool,
}

/// Per-machine monitoring session.
pub struct MonitorSession {
    machine_id: String,
    generator: ReadingGenerator,
    classifier: ThresholdClassifier,
    readings: VecDeque<TelemetryReading>,
    reading_capacity: usize,
    status: SystemStatus,
    console_log: AlertLog,
    full_log: AlertLog,
    last_recalibrated: Option<DateTime<Utc>>,
    ticks: u64,
}

impl MonitorSession {
    pub fn new(machine_id: impl Into<String>, config: &MonitorConfig, seed: Option<u64>) -> Self {
        Self {
            machine_id: machine_id.into(),
            generator: ReadingGenerator::new(seed),
            classifier: ThresholdClassifier::new(config.bands.clone()),
            readings: VecDeque::with_capacity(config.buffers.reading_capacity),
            reading_capacity: config.buffers.reading_capacity,
            status: SystemStatus::Nominal,
            console_log: AlertLog::new(config.buffers.console_log_capacity),
            full_log: AlertLog::new(config.buffers.full_log_capacity),
            last_recalibrated: None,
            ticks: 0,
        }
    }

    /// Run one full tick: generate a reading, classify it, apply the state
    /// machine, and record any alert.
    pub fn tick(&mut self) -> TickOutcome {
        let reading = self.generator.next_reading();
        self.ingest(reading)
    }

    /// Ingest an externally produced reading (service poll or test vector)
    /// through the same classify/transition/log path as a generated one.
    pub fn ingest(&mut self, reading: TelemetryReading) -> TickOutcome {
        self.ticks += 1;
        self.push_reading(reading.clone());

        let breach = self.classifier.classify_reading(&reading);
        let escalated = match (&breach, self.status) {
            (Some(b), SystemStatus::Nominal) => {
                self.status = SystemStatus::Degraded;
                let level = if b.tier == SeverityTier::Critical {
                    LogLevel::Critical
                } else {
                    LogLevel::Warning
                };
                let message = format!(
                    "{}: status DEGRADED - {} (awaiting recalibration)",
                    self.machine_id, b
                );
                warn!(machine = %self.machine_id, channel = b.channel, value = b.value, "Anomaly escalation");
                self.console_log.record(level, message.clone());
                self.full_log.record(level, message);
                true
            }
            // Re-entrant anomalies while already non-nominal: no duplicate
            // escalation, no extra log entries.
            (Some(b), _) => {
                debug!(machine = %self.machine_id, channel = b.channel, "Anomaly while already non-nominal");
                false
            }
            (None, _) => false,
        };

        TickOutcome {
            reading,
            breach,
            escalated,
        }
    }

    /// Operator action: unconditionally reset status to Nominal.
    ///
    /// Idempotent - recalibrating while already Nominal just logs the
    /// action again.
    pub fn recalibrate(&mut self) {
        let previous = self.status;
        self.status = SystemStatus::Nominal;
        self.last_recalibrated = Some(Utc::now());
        let message = format!(
            "{}: baseline recalibrated by operator (was {})",
            self.machine_id, previous
        );
        info!(machine = %self.machine_id, previous = %previous, "Recalibrate");
        self.console_log.record(LogLevel::Info, message.clone());
        self.full_log.record(LogLevel::Info, message);
    }

    /// Record an operational note (e.g. a prediction fallback) in both
    /// log views without touching the status machine.
    pub fn note(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        self.console_log.record(level, message.clone());
        self.full_log.record(level, message);
    }

    fn push_reading(&mut self, reading: TelemetryReading) {
        if self.reading_capacity == 0 {
            return;
        }
        if self.readings.len() >= self.reading_capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn status(&self) -> SystemStatus {
        self.status
    }

    /// Readings in arrival order (oldest first).
    pub fn readings(&self) -> impl Iterator<Item = &TelemetryReading> {
        self.readings.iter()
    }

    pub fn latest_reading(&self) -> Option<&TelemetryReading> {
        self.readings.back()
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    pub fn console_log(&self) -> &AlertLog {
        &self.console_log
    }

    pub fn full_log(&self) -> &AlertLog {
        &self.full_log
    }

    pub fn classifier(&self) -> &ThresholdClassifier {
        &self.classifier
    }

    pub fn last_recalibrated(&self) -> Option<DateTime<Utc>> {
        self.last_recalibrated
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Temperature slope over the retained buffer (°C per reading),
    /// least-squares fit. Returns 0.0 with fewer than two readings.
    pub fn temperature_slope(&self) -> f64 {
        let n = self.readings.len();
        if n < 2 {
            return 0.0;
        }
        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = self.readings.iter().map(|r| r.temperature).sum::<f64>() / n_f;
        let mut num = 0.0;
        let mut den = 0.0;
        for (i, r) in self.readings.iter().enumerate() {
            let dx = i as f64 - mean_x;
            num += dx * (r.temperature - mean_y);
            den += dx * dx;
        }
        if den.abs() < f64::EPSILON {
            0.0
        } else {
            num / den
        }
    }
}
