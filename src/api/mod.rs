//! REST API module using Axum
//!
//! HTTP surface of the monitor: telemetry views, logs, the fleet health
//! board, and the operator actions (recalibrate, predict). Every response
//! uses the envelope from [`envelope`].

pub mod envelope;
pub mod handlers;

pub use handlers::DashboardState;

use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Liveness probe. No envelope; load balancers only look at the status.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `AEGISOPS_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for development (e.g., `http://localhost:5173` for a dashboard dev server).
fn build_cors_layer() -> CorsLayer {
    match std::env::var("AEGISOPS_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    }
}

fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/telemetry/:machine_id", get(handlers::get_telemetry))
        .route(
            "/telemetry/:machine_id/latest",
            get(handlers::get_latest_telemetry),
        )
        .route("/logs/:machine_id", get(handlers::get_logs))
        .route("/fleet", get(handlers::get_fleet))
        .route("/recalibrate/:machine_id", post(handlers::post_recalibrate))
        .route("/predict/:machine_id", post(handlers::post_predict))
        .with_state(state)
}

/// Create the complete application router.
pub fn create_app(state: DashboardState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .nest("/api/v1", api_routes(state))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
