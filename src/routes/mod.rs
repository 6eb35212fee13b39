use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{AppState, controllers::home_controller};

pub mod config_routes;
pub mod history_routes;
pub mod home_routes;
pub mod instruments_routes;
pub mod logs_routes;
pub mod realtime_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = instruments_routes::add_routes(router);
    let router = config_routes::add_routes(router);
    let router = history_routes::add_routes(router);
    let router = logs_routes::add_routes(router);
    let router = realtime_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
