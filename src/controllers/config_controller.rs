use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{AppState, models::PollConfig, services::config_service};

// GET /config
pub async fn get_config(State(state): State<AppState>) -> Response {
    match config_service::load_poll_config(state.storage.as_ref()).await {
        Ok(cfg) => Json(cfg).into_response(),
        Err(e) => e.into_response(),
    }
}

// PUT /config
pub async fn put_config(State(state): State<AppState>, Json(cfg): Json<PollConfig>) -> Response {
    match config_service::save_poll_config(&state, cfg).await {
        Ok(saved) => Json(saved).into_response(),
        Err(e) => e.into_response(),
    }
}
