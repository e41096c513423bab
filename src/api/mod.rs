// HTTP API routes (round control, metrics, WebSocket streaming).

pub mod ws;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::config::Config;
use crate::engine::chain::Heading;
use crate::engine::server::{RoundError, RoundServer};
use crate::metrics;

// ── Request types ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct StartRoundRequest {
    pub tick_ms: Option<u64>,
    pub max_ticks: Option<u64>,
}

#[derive(Deserialize)]
pub struct RoundInputRequest {
    pub heading: Heading,
}

// ── State & router ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub round_server: Arc<RoundServer>,
    pub config: Arc<Config>,
}

pub fn router(round_server: Arc<RoundServer>, config: Config) -> Router {
    let state = AppState {
        round_server,
        config: Arc::new(config),
    };

    Router::new()
        .route("/api/round", post(start_round).get(round_info))
        .route("/api/round/stop", post(stop_round))
        .route("/api/round/input", post(round_input))
        .route("/ws/round", get(ws::ws_round))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────────────

/// Start a new round. Optional body overrides the configured tick
/// cadence and tick limit. 409 if a round is already running.
async fn start_round(
    State(state): State<AppState>,
    body: Option<Json<StartRoundRequest>>,
) -> impl IntoResponse {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let tick_ms = req.tick_ms.unwrap_or(state.config.tick_ms);
    let max_ticks = req.max_ticks.unwrap_or(state.config.max_ticks);

    match state.round_server.start_round(tick_ms, max_ticks) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "started", "tick_ms": tick_ms, "max_ticks": max_ticks })),
        ),
        Err(e @ RoundError::AlreadyRunning) => {
            (StatusCode::CONFLICT, Json(json!({ "error": e.to_string() })))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

/// Stop the running round.
async fn stop_round(State(state): State<AppState>) -> impl IntoResponse {
    match state.round_server.stop_round() {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "stopping" }))),
        Err(e) => (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))),
    }
}

/// Steer the running round. Unknown heading strings are rejected by
/// deserialization before this handler runs; a reversal request is
/// accepted here and ignored by the engine.
async fn round_input(
    State(state): State<AppState>,
    Json(req): Json<RoundInputRequest>,
) -> impl IntoResponse {
    if !state.round_server.is_running() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": RoundError::NotRunning.to_string() })),
        );
    }
    state.round_server.steer(req.heading);
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Metadata about the active round.
async fn round_info(State(state): State<AppState>) -> impl IntoResponse {
    match state.round_server.active_round_info() {
        Some(info) => (StatusCode::OK, Json(json!(info))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": RoundError::NotRunning.to_string() })),
        ),
    }
}

/// Prometheus text exposition endpoint.
async fn metrics_handler() -> impl IntoResponse {
    metrics::gather_metrics()
}
