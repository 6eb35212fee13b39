use crate::{
    AppState,
    error::{MonitorError, Result},
    events::ServerEvent,
    models::PollConfig,
    services::storage::{POLL_CONFIG_KEY, Storage},
};

/// Stored poll config, or `ConfigMissing` when nothing has been saved yet.
pub async fn read_poll_config(storage: &dyn Storage) -> Result<PollConfig> {
    match storage.get(POLL_CONFIG_KEY).await? {
        Some(v) => Ok(serde_json::from_value(v)?),
        None => Err(MonitorError::ConfigMissing(POLL_CONFIG_KEY.to_string())),
    }
}

/// Like `read_poll_config`, but a missing config becomes the defaults.
pub async fn load_poll_config(storage: &dyn Storage) -> Result<PollConfig> {
    match read_poll_config(storage).await {
        Err(MonitorError::ConfigMissing(key)) => {
            tracing::debug!(key = %key, "no poll config stored, using defaults");
            Ok(PollConfig::default())
        }
        other => other,
    }
}

pub fn validate(config: &PollConfig) -> Result<()> {
    if !config.cooldown_period_minutes.is_finite() || config.cooldown_period_minutes < 0.0 {
        return Err(MonitorError::InvalidConfig(
            "Cooldown period must be zero or more minutes.".into(),
        ));
    }
    Ok(())
}

pub async fn save_poll_config(state: &AppState, config: PollConfig) -> Result<PollConfig> {
    validate(&config)?;

    state
        .storage
        .set(POLL_CONFIG_KEY, serde_json::to_value(config)?)
        .await?;

    state
        .activity
        .success("Poll configuration saved successfully");
    let _ = state.events_tx.send(ServerEvent::json("configUpdated", &config));

    Ok(config)
}
