use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::state::AdminState;

/// Builds the admin router: `/healthz`, `/metrics`, `/buildinfo`.
/// `/debug/pprof/*` is intentionally absent (see DESIGN.md).
pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route("/buildinfo", get(buildinfo))
        .with_state(state)
}

async fn healthz(State(state): State<AdminState>) -> Response {
    if state.ready.load(Ordering::SeqCst) {
        (StatusCode::OK, "ok\n").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready\n").into_response()
    }
}

async fn metrics(State(state): State<AdminState>) -> Response {
    let snap = state.metrics.snapshot(&state.graph);

    let body = format!(
        "# HELP depgraphd_connections_total Total accepted TCP connections.\n\
         # TYPE depgraphd_connections_total counter\n\
         depgraphd_connections_total {connections_total}\n\
         # HELP depgraphd_commands_processed_total Total well-formed commands dispatched.\n\
         # TYPE depgraphd_commands_processed_total counter\n\
         depgraphd_commands_processed_total {commands_processed_total}\n\
         # HELP depgraphd_errors_total Total malformed or rejected commands.\n\
         # TYPE depgraphd_errors_total counter\n\
         depgraphd_errors_total {errors_total}\n\
         # HELP depgraphd_packages_indexed_total Total successful INDEX operations.\n\
         # TYPE depgraphd_packages_indexed_total counter\n\
         depgraphd_packages_indexed_total {packages_indexed_total}\n\
         # HELP depgraphd_indexed_packages Current number of indexed packages.\n\
         # TYPE depgraphd_indexed_packages gauge\n\
         depgraphd_indexed_packages {indexed_count}\n\
         # HELP depgraphd_uptime_seconds Seconds since the process started.\n\
         # TYPE depgraphd_uptime_seconds gauge\n\
         depgraphd_uptime_seconds {uptime_seconds}\n",
        connections_total = snap.connections_total,
        commands_processed_total = snap.commands_processed_total,
        errors_total = snap.errors_total,
        packages_indexed_total = snap.packages_indexed_total,
        indexed_count = snap.indexed_count,
        uptime_seconds = snap.uptime_seconds,
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

#[derive(Serialize)]
struct BuildInfo {
    version: &'static str,
    rust_log_enabled: bool,
    started_at: String,
}

async fn buildinfo(State(state): State<AdminState>) -> Response {
    let info = BuildInfo {
        version: state.version,
        rust_log_enabled: state.logging_enabled,
        started_at: state.started_at.to_rfc3339(),
    };
    axum::Json(info).into_response()
}
