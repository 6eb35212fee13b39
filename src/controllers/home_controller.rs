use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::AppState;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

// GET /status
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    // the engine lock is held by a running cycle or an instrument edit
    let busy = state.monitor.try_lock().is_err();

    Json(json!({
        "poll_interval_secs": state.settings.poll_interval_secs,
        "analysis_cooldown_secs": state.settings.analysis_cooldown_secs,
        "engine_busy": busy,
        "price_feed_configured": !state.settings.finnhub_api_key.trim().is_empty(),
    }))
}
