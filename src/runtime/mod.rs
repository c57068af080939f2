//! Monitor runtime - cancellable periodic tasks driving the sessions.
//!
//! One tick task per machine: each tick runs generate -> classify ->
//! transition -> log to completion before the next tick begins (interval
//! with `MissedTickBehavior::Delay`, so ticks never overlap). A separate
//! task refreshes the fleet view on its own longer interval. All tasks
//! select on a shared `CancellationToken`; cancelling it stops every loop
//! deterministically and is idempotent.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, Semaphore, TryAcquireError};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::defaults::ASSUMED_TIME_SINCE_MAINTENANCE_HOURS;
use crate::config::MonitorConfig;
use crate::fleet::FleetHealth;
use crate::prediction::{build_feature_vector, PredictionClientError, PredictionService};
use crate::session::MonitorSession;
use crate::types::{PredictionOutcome, TelemetryReading};

/// Shared handle to one machine's session.
pub type SharedSession = Arc<RwLock<MonitorSession>>;

/// Composite 0-100 health score from the latest reading.
///
/// Inverts the service's risk model: vibration contributes up to 30 points
/// of risk, temperature and kurtosis up to 25 each, and time since
/// maintenance up to 20; health is 100 minus accumulated risk.
pub fn composite_health(reading: &TelemetryReading, time_since_maintenance: f64) -> f64 {
    let vibration_risk = (reading.vibration_rms / 50.0) * 30.0;
    let temp_risk = ((reading.temperature - 45.0) / 30.0).max(0.0) * 25.0;
    let kurtosis_risk = ((reading.vibration_kurtosis - 3.0) / 5.0).max(0.0) * 25.0;
    let maintenance_risk = (time_since_maintenance / 500.0).min(1.0) * 20.0;
    (100.0 - (vibration_risk + temp_risk + kurtosis_risk + maintenance_risk)).clamp(0.0, 100.0)
}

/// Errors from the prediction entry point.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown machine: {0}")]
    UnknownMachine(String),
    #[error("no telemetry collected yet for {0}")]
    NoTelemetry(String),
    #[error("a prediction request is already in flight")]
    PredictionInFlight,
    #[error(transparent)]
    Prediction(#[from] PredictionClientError),
}

/// Owns the sessions, the fleet view, and the background tasks.
pub struct MonitorRuntime {
    sessions: HashMap<String, SharedSession>,
    fleet: Arc<RwLock<FleetHealth>>,
    /// One permit per machine - at most one in-flight prediction each.
    prediction_lanes: HashMap<String, Arc<Semaphore>>,
    cancel: CancellationToken,
    tasks: std::sync::Mutex<Vec<JoinHandle<()>>>,
    config: MonitorConfig,
}

impl MonitorRuntime {
    /// Build sessions for every machine in the fleet roster.
    ///
    /// When a seed is given, each machine gets a distinct derived seed so
    /// runs are reproducible without every machine being identical.
    pub fn new(config: MonitorConfig, seed: Option<u64>) -> Self {
        let mut sessions = HashMap::new();
        let mut prediction_lanes = HashMap::new();

        for (i, machine_id) in config.fleet.machines.iter().enumerate() {
            let machine_seed = seed.map(|s| s.wrapping_add(i as u64));
            sessions.insert(
                machine_id.clone(),
                Arc::new(RwLock::new(MonitorSession::new(
                    machine_id.clone(),
                    &config,
                    machine_seed,
                ))),
            );
            prediction_lanes.insert(machine_id.clone(), Arc::new(Semaphore::new(1)));
        }

        Self {
            sessions,
            fleet: Arc::new(RwLock::new(FleetHealth::aggregate(Vec::new()))),
            prediction_lanes,
            cancel: CancellationToken::new(),
            tasks: std::sync::Mutex::new(Vec::new()),
            config,
        }
    }

    pub fn session(&self, machine_id: &str) -> Option<SharedSession> {
        self.sessions.get(machine_id).cloned()
    }

    pub fn machine_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn fleet(&self) -> Arc<RwLock<FleetHealth>> {
        Arc::clone(&self.fleet)
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Spawn the per-machine tick loops and the fleet refresh loop.
    pub fn spawn(&self) {
        let mut handles = Vec::with_capacity(self.sessions.len() + 1);
        for (machine_id, session) in &self.sessions {
            handles.push(spawn_tick_loop(
                machine_id.clone(),
                Arc::clone(session),
                Duration::from_secs(self.config.intervals.console_tick_secs),
                self.cancel.clone(),
            ));
        }

        handles.push(spawn_fleet_loop(
            self.sessions.clone(),
            Arc::clone(&self.fleet),
            Duration::from_secs(self.config.intervals.fleet_refresh_secs),
            self.cancel.clone(),
        ));

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.extend(handles);
        }

        info!(
            machines = self.sessions.len(),
            tick_secs = self.config.intervals.console_tick_secs,
            "Monitor runtime started"
        );
    }

    /// Stop all background tasks. Idempotent; returns once every task has
    /// exited, so no orphaned ticks continue after teardown.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let drained: Vec<JoinHandle<()>> = match self.tasks.lock() {
            Ok(mut tasks) => tasks.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for result in futures::future::join_all(drained).await {
            if let Err(e) = result {
                debug!(error = %e, "Background task join error during shutdown");
            }
        }
        info!("Monitor runtime stopped");
    }

    /// Issue one prediction request for a machine through the adapter.
    ///
    /// Enforces at most one in-flight request per machine: a second call
    /// while one is pending fails fast with `PredictionInFlight`.
    pub async fn request_prediction(
        &self,
        service: &dyn PredictionService,
        machine_id: &str,
    ) -> Result<PredictionOutcome, RuntimeError> {
        let session = self
            .sessions
            .get(machine_id)
            .ok_or_else(|| RuntimeError::UnknownMachine(machine_id.to_string()))?;
        let lane = self
            .prediction_lanes
            .get(machine_id)
            .ok_or_else(|| RuntimeError::UnknownMachine(machine_id.to_string()))?;

        let _permit = match lane.try_acquire() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => return Err(RuntimeError::PredictionInFlight),
            Err(TryAcquireError::Closed) => return Err(RuntimeError::PredictionInFlight),
        };

        let features = {
            let session = session.read().await;
            build_feature_vector(&session)
                .ok_or_else(|| RuntimeError::NoTelemetry(machine_id.to_string()))?
        };

        let outcome = service.request_prediction(machine_id, &features).await?;
        if outcome.is_fallback() {
            session.write().await.note(
                crate::types::LogLevel::Warning,
                format!("{machine_id}: prediction service unreachable, fallback shown"),
            );
        }
        Ok(outcome)
    }
}

fn spawn_tick_loop(
    machine_id: String,
    session: SharedSession,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(machine = %machine_id, "Tick loop stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let mut session = session.write().await;
                    let outcome = session.tick();
                    if outcome.escalated {
                        debug!(machine = %machine_id, "Escalation recorded this tick");
                    }
                }
            }
        }
    })
}

fn spawn_fleet_loop(
    sessions: HashMap<String, SharedSession>,
    fleet: Arc<RwLock<FleetHealth>>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Fleet refresh loop stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let mut scores = Vec::with_capacity(sessions.len());
                    let mut classifier = None;
                    for (machine_id, session) in &sessions {
                        let session = session.read().await;
                        if classifier.is_none() {
                            classifier = Some(session.classifier().clone());
                        }
                        if let Some(reading) = session.latest_reading() {
                            scores.push((
                                machine_id.clone(),
                                composite_health(reading, ASSUMED_TIME_SINCE_MAINTENANCE_HOURS),
                            ));
                        }
                    }
                    if let Some(classifier) = classifier {
                        let view = FleetHealth::from_scores(&classifier, scores);
                        *fleet.write().await = view;
                    }
                }
            }
        }
    })
}
