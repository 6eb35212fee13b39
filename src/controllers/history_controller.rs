use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{AppState, services::price_history};

// GET /history
pub async fn get_all_history(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.history.all_history())
}

// GET /history/:symbol
pub async fn get_symbol_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> impl IntoResponse {
    let sym = symbol.trim().to_uppercase();
    let entries = state.history.recent_history(&sym);
    let text = price_history::format_history(&entries);

    Json(json!({
        "symbol": sym,
        "entries": entries,
        "formatted": text,
    }))
}
