//! HTTP handlers for the monitor dashboard API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Response;
use serde_json::json;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::prediction::{PredictionClientError, PredictionService};
use crate::runtime::{MonitorRuntime, RuntimeError};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct DashboardState {
    pub runtime: Arc<MonitorRuntime>,
    pub prediction: Arc<dyn PredictionService>,
}

/// `GET /api/v1/status` - monitor overview: machines and their system status.
pub async fn get_status(State(state): State<DashboardState>) -> Response {
    let mut machines = Vec::new();
    for machine_id in state.runtime.machine_ids() {
        if let Some(session) = state.runtime.session(&machine_id) {
            let session = session.read().await;
            machines.push(json!({
                "machine_id": machine_id,
                "status": session.status(),
                "ticks": session.ticks(),
                "readings_buffered": session.reading_count(),
                "last_recalibrated": session.last_recalibrated(),
            }));
        }
    }
    let intervals = &state.runtime.config().intervals;
    ApiResponse::ok(json!({
        "machines": machines,
        // Poll cadence hints for dashboard clients
        "intervals": {
            "console_tick_secs": intervals.console_tick_secs,
            "latest_poll_secs": intervals.latest_poll_secs,
            "fleet_refresh_secs": intervals.fleet_refresh_secs,
        },
    }))
}

/// `GET /api/v1/telemetry/{id}` - buffered readings, oldest first.
pub async fn get_telemetry(
    State(state): State<DashboardState>,
    Path(machine_id): Path<String>,
) -> Response {
    let Some(session) = state.runtime.session(&machine_id) else {
        return ApiErrorResponse::not_found(format!("unknown machine: {machine_id}"));
    };
    let session = session.read().await;
    let readings: Vec<_> = session.readings().cloned().collect();
    ApiResponse::ok(json!({
        "machine_id": machine_id,
        "count": readings.len(),
        "data": readings,
    }))
}

/// `GET /api/v1/telemetry/{id}/latest` - most recent reading, or a
/// placeholder when no telemetry has arrived yet.
pub async fn get_latest_telemetry(
    State(state): State<DashboardState>,
    Path(machine_id): Path<String>,
) -> Response {
    let Some(session) = state.runtime.session(&machine_id) else {
        return ApiErrorResponse::not_found(format!("unknown machine: {machine_id}"));
    };
    let session = session.read().await;
    ApiResponse::ok(json!({
        "machine_id": machine_id,
        "reading": session.latest_reading(),
    }))
}

/// `GET /api/v1/logs/{id}` - full log view, newest first.
pub async fn get_logs(
    State(state): State<DashboardState>,
    Path(machine_id): Path<String>,
) -> Response {
    let Some(session) = state.runtime.session(&machine_id) else {
        return ApiErrorResponse::not_found(format!("unknown machine: {machine_id}"));
    };
    let session = session.read().await;
    ApiResponse::ok(json!({
        "machine_id": machine_id,
        "console": session.console_log().entries(),
        "full": session.full_log().entries(),
    }))
}

/// `GET /api/v1/fleet` - fleet summary and worst-first machine list.
pub async fn get_fleet(State(state): State<DashboardState>) -> Response {
    let fleet = state.runtime.fleet();
    let view = fleet.read().await.clone();
    ApiResponse::ok(view)
}

/// `POST /api/v1/recalibrate/{id}` - operator action, resets status to
/// nominal.
pub async fn post_recalibrate(
    State(state): State<DashboardState>,
    Path(machine_id): Path<String>,
) -> Response {
    let Some(session) = state.runtime.session(&machine_id) else {
        return ApiErrorResponse::not_found(format!("unknown machine: {machine_id}"));
    };
    let mut session = session.write().await;
    session.recalibrate();
    ApiResponse::ok(json!({
        "machine_id": machine_id,
        "status": session.status(),
    }))
}

/// `POST /api/v1/predict/{id}` - issue one prediction request through the
/// adapter. Fallback outcomes are 200s tagged `"outcome": "fallback"`;
/// structured service errors surface verbatim.
pub async fn post_predict(
    State(state): State<DashboardState>,
    Path(machine_id): Path<String>,
) -> Response {
    match state
        .runtime
        .request_prediction(state.prediction.as_ref(), &machine_id)
        .await
    {
        Ok(outcome) => ApiResponse::ok(outcome),
        Err(RuntimeError::UnknownMachine(id)) => {
            ApiErrorResponse::not_found(format!("unknown machine: {id}"))
        }
        Err(RuntimeError::NoTelemetry(id)) => {
            ApiErrorResponse::unprocessable("NO_TELEMETRY", format!("no telemetry yet for {id}"))
        }
        Err(RuntimeError::PredictionInFlight) => {
            ApiErrorResponse::conflict("a prediction request is already in flight")
        }
        Err(RuntimeError::Prediction(PredictionClientError::Service(err))) => {
            ApiErrorResponse::unprocessable(&err.code.to_string(), err.message)
        }
        Err(RuntimeError::Prediction(PredictionClientError::MalformedResponse(msg))) => {
            ApiErrorResponse::bad_gateway(msg)
        }
    }
}
