use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::realtime_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/events", get(realtime_controller::sse_events))
        .route("/poll", post(realtime_controller::post_poll))
}
