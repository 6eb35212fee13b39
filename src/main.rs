use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use stockwatch::{
    AppState, config, events,
    services::{
        activity_log::ActivityLog,
        alert_monitor,
        analysis::RuleBasedAnalyst,
        clock::{Clock, SystemClock},
        finnhub::FinnhubClient,
        notifier::BroadcastNotifier,
        poll_cycle::Collaborators,
        price_history::PriceHistoryStore,
        storage::FileStorage,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = config::load();

    if settings.finnhub_api_key.trim().is_empty() {
        tracing::warn!("FINNHUB_API_KEY is not set; every price fetch will fail");
    }

    let (events_tx, _events_rx) = events::channel(256);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let deps = Collaborators {
        storage: Arc::new(FileStorage::new(&settings.storage_path)),
        prices: Arc::new(FinnhubClient::from_settings(&settings)),
        analyst: Arc::new(RuleBasedAnalyst),
        notifier: Arc::new(BroadcastNotifier::new(events_tx.clone())),
        clock: clock.clone(),
        history: Arc::new(PriceHistoryStore::new()),
        activity: Arc::new(ActivityLog::new(clock, Some(events_tx.clone()))),
    };

    let state = AppState::new(settings.clone(), deps, events_tx);

    // first check right away, then on every interval tick
    if let Some(Err(e)) = alert_monitor::run_now(&state).await {
        tracing::error!("initial poll failed: {}", e);
    }
    alert_monitor::spawn_price_alert_monitor(state.clone());
    alert_monitor::spawn_daily_reset(state.clone());

    let app = stockwatch::routes::app(state);

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>()?, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
