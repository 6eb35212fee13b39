use axum::{Router, routing::{delete, get}};
use crate::{AppState, controllers::instruments_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/instruments",
            get(instruments_controller::get_instruments)
                .post(instruments_controller::post_instrument)
                .delete(instruments_controller::delete_all_instruments),
        )
        .route("/instruments/:symbol", delete(instruments_controller::delete_instrument))
}
