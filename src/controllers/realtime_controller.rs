use std::{convert::Infallible, time::Duration};

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use crate::{AppState, services::alert_monitor};

// GET /events  (SSE)
pub async fn sse_events(
    State(state): State<AppState>,
) -> Sse<impl futures_util::stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();

    let stream = futures_util::stream::unfold(rx, |mut rx| async {
        let evt = match rx.recv().await {
            Ok(e) => Event::default().event(e.name).data(e.data),
            Err(RecvError::Lagged(_)) => Event::default().event("ping").data("lagged"),
            Err(RecvError::Closed) => return None,
        };

        Some((Ok(evt), rx))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(20))
            .text("keep-alive"),
    )
}

// POST /poll
pub async fn post_poll(State(state): State<AppState>) -> Response {
    match alert_monitor::run_now(&state).await {
        Some(Ok(report)) => Json(report).into_response(),
        Some(Err(e)) => e.into_response(),
        None => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "a poll cycle is already running" })),
        )
            .into_response(),
    }
}
