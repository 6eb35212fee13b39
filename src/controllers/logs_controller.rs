use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

// GET /logs
pub async fn get_logs(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "logs": state.activity.entries(),
        "llm_interactions": state.activity.llm_interactions(),
    }))
}

// DELETE /logs
pub async fn delete_logs(State(state): State<AppState>) -> impl IntoResponse {
    state.activity.clear();
    StatusCode::NO_CONTENT
}

// GET /logs/download
pub async fn get_logs_download(State(state): State<AppState>) -> Response {
    let body = state.activity.format_for_download();
    let filename = state.activity.download_filename();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if let Ok(v) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, v);
    }

    (StatusCode::OK, headers, body).into_response()
}
