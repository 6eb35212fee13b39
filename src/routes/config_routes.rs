use axum::{Router, routing::get};
use crate::{AppState, controllers::config_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/config",
        get(config_controller::get_config).put(config_controller::put_config),
    )
}
