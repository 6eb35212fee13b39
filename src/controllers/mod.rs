use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::MonitorError;

pub mod config_controller;
pub mod history_controller;
pub mod home_controller;
pub mod instruments_controller;
pub mod logs_controller;
pub mod realtime_controller;

impl IntoResponse for MonitorError {
    fn into_response(self) -> Response {
        let status = match &self {
            MonitorError::InvalidInstrument(_) | MonitorError::InvalidConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            MonitorError::ConfigMissing(_) => StatusCode::NOT_FOUND,
            MonitorError::Fetch { .. } | MonitorError::Analysis { .. } => StatusCode::BAD_GATEWAY,
            MonitorError::Storage(_) | MonitorError::Json(_) | MonitorError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            MonitorError::InvalidInstrument(m) | MonitorError::InvalidConfig(m) => m.clone(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
