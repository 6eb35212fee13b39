use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, services::instruments_service};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentForm {
    pub symbol: String,
    pub lower_threshold: f64,
    pub upper_threshold: f64,
}

// GET /instruments
pub async fn get_instruments(State(state): State<AppState>) -> Response {
    match instruments_service::list(&state).await {
        Ok(list) => Json(list).into_response(),
        Err(e) => e.into_response(),
    }
}

// POST /instruments
pub async fn post_instrument(
    State(state): State<AppState>,
    Json(form): Json<InstrumentForm>,
) -> Response {
    match instruments_service::upsert(
        &state,
        &form.symbol,
        form.lower_threshold,
        form.upper_threshold,
    )
    .await
    {
        Ok(inst) => (StatusCode::OK, Json(inst)).into_response(),
        Err(e) => e.into_response(),
    }
}

// DELETE /instruments/:symbol
pub async fn delete_instrument(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Response {
    match instruments_service::remove(&state, &symbol).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("{} is not monitored", symbol.to_uppercase()) })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// DELETE /instruments
pub async fn delete_all_instruments(State(state): State<AppState>) -> Response {
    match instruments_service::clear_all(&state).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
