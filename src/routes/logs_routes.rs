use axum::{Router, routing::get};
use crate::{AppState, controllers::logs_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/logs",
            get(logs_controller::get_logs).delete(logs_controller::delete_logs),
        )
        .route("/logs/download", get(logs_controller::get_logs_download))
}
