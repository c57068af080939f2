//! Monitor Regression Tests
//!
//! End-to-end properties of the monitoring core driven through the public
//! crate API: escalation latching, log caps, fleet refresh, and the
//! single-in-flight prediction guard.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use aegisops::config::MonitorConfig;
use aegisops::prediction::{fallback_result, PredictionClientError, PredictionService};
use aegisops::runtime::{MonitorRuntime, RuntimeError};
use aegisops::session::MonitorSession;
use aegisops::types::{
    FeatureVector, LogLevel, PredictionOutcome, SystemStatus, TelemetryReading,
};

const MACHINE: &str = "CNC-ALPHA-921";

fn reading(rms: f64) -> TelemetryReading {
    TelemetryReading {
        timestamp: Utc::now(),
        vibration_rms: rms,
        vibration_peak: rms * 1.7,
        vibration_kurtosis: 3.2,
        temperature: 44.0,
        power_consumption: 12.0,
        anomaly_flag: false,
    }
}

/// Stub that holds the permit long enough for a second caller to collide.
struct SlowStub;

#[async_trait]
impl PredictionService for SlowStub {
    async fn request_prediction(
        &self,
        machine_id: &str,
        _features: &FeatureVector,
    ) -> Result<PredictionOutcome, PredictionClientError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(PredictionOutcome::Fallback(fallback_result(machine_id)))
    }
}

/// A seeded session run long enough to hit the ~2% anomaly injection ends
/// up Degraded with exactly one escalation entry, and recalibration is the
/// only way back.
#[test]
fn test_long_run_latches_once_until_recalibrated() {
    let mut session = MonitorSession::new(MACHINE, &MonitorConfig::default(), Some(9));

    for _ in 0..2_000 {
        session.tick();
    }

    // 2000 ticks at p=0.02 makes a missed anomaly astronomically unlikely
    assert_eq!(session.status(), SystemStatus::Degraded);
    assert_eq!(session.console_log().len(), 1);
    assert!(session.console_log().entries()[0]
        .message
        .contains("DEGRADED"));

    session.recalibrate();
    assert_eq!(session.status(), SystemStatus::Nominal);
    assert_eq!(session.console_log().len(), 2);
}

/// Console and full log views cap at 15 and 100 entries, newest first.
#[test]
fn test_log_views_cap_at_configured_sizes() {
    let mut session = MonitorSession::new(MACHINE, &MonitorConfig::default(), Some(1));

    for i in 0..120 {
        session.note(LogLevel::Info, format!("note {i}"));
    }

    assert_eq!(session.console_log().len(), 15);
    assert_eq!(session.full_log().len(), 100);
    assert_eq!(session.console_log().entries()[0].message, "note 119");
    assert_eq!(session.full_log().entries()[99].message, "note 20");
}

/// The spawned fleet loop aggregates every machine with telemetry into the
/// shared view, and shutdown stops it.
#[tokio::test]
async fn test_fleet_view_refreshes_and_stops_on_shutdown() {
    let mut config = MonitorConfig::default();
    config.intervals.fleet_refresh_secs = 1;
    // Long tick so the generators stay quiet during the test
    config.intervals.console_tick_secs = 3_600;

    let runtime = Arc::new(MonitorRuntime::new(config, Some(5)));
    for machine_id in runtime.machine_ids() {
        let session = runtime.session(&machine_id).unwrap();
        session.write().await.ingest(reading(20.0));
    }

    runtime.spawn();
    // interval() fires immediately; give the first refresh time to land
    tokio::time::sleep(Duration::from_millis(150)).await;
    runtime.shutdown().await;

    let fleet = runtime.fleet();
    let view = fleet.read().await.clone();
    assert_eq!(view.summary.total_machines, 8);
    assert_eq!(view.summary.band_total(), 8);
    assert!(view.summary.average_health > 0.0);
    // Worst-first ordering
    for pair in view.machines.windows(2) {
        assert!(pair[0].health_score <= pair[1].health_score);
    }
}

/// A second prediction request while one is pending fails fast with
/// PredictionInFlight instead of queueing.
#[tokio::test]
async fn test_second_prediction_collides_while_first_in_flight() {
    let runtime = MonitorRuntime::new(MonitorConfig::default(), Some(1));
    let session = runtime.session(MACHINE).unwrap();
    session.write().await.ingest(reading(20.0));

    let stub = SlowStub;
    let first = runtime.request_prediction(&stub, MACHINE);
    let second = async {
        // Let the first call take the permit
        tokio::time::sleep(Duration::from_millis(50)).await;
        runtime.request_prediction(&stub, MACHINE).await
    };

    let (first, second) = tokio::join!(first, second);
    assert!(first.is_ok());
    assert!(matches!(second, Err(RuntimeError::PredictionInFlight)));

    // The permit is released once the first call completes
    let third = runtime.request_prediction(&stub, MACHINE).await;
    assert!(third.is_ok());
}

/// Separate machines have separate prediction lanes.
#[tokio::test]
async fn test_prediction_lanes_are_per_machine() {
    let runtime = MonitorRuntime::new(MonitorConfig::default(), Some(1));
    for machine_id in ["CNC-ALPHA-921", "CNC-BETA-101"] {
        let session = runtime.session(machine_id).unwrap();
        session.write().await.ingest(reading(20.0));
    }

    let stub = SlowStub;
    let (a, b) = tokio::join!(
        runtime.request_prediction(&stub, "CNC-ALPHA-921"),
        runtime.request_prediction(&stub, "CNC-BETA-101"),
    );
    assert!(a.is_ok());
    assert!(b.is_ok());
}
