use axum::{Router, routing::get};
use crate::{AppState, controllers::history_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/history", get(history_controller::get_all_history))
        .route("/history/:symbol", get(history_controller::get_symbol_history))
}
