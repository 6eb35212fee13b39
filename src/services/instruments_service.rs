use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use crate::{
    AppState,
    error::{MonitorError, Result},
    events::ServerEvent,
    models::MonitoredInstrument,
    services::storage::{STOCKS_KEY, Storage},
};

static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9][A-Z0-9.\-]{0,19}$").expect("symbol regex is valid")
});

/// Normalises the symbol and rejects bands the engine cannot evaluate.
pub fn validate(symbol: &str, lower: f64, upper: f64) -> Result<MonitoredInstrument> {
    let sym = symbol.trim().to_uppercase();

    if sym.is_empty() {
        return Err(MonitorError::InvalidInstrument("Symbol is required.".into()));
    }
    if !SYMBOL_RE.is_match(&sym) {
        return Err(MonitorError::InvalidInstrument(format!(
            "'{sym}' is not a valid symbol."
        )));
    }
    if !lower.is_finite() || !upper.is_finite() {
        return Err(MonitorError::InvalidInstrument(
            "Thresholds must be numbers.".into(),
        ));
    }
    if lower <= 0.0 {
        return Err(MonitorError::InvalidInstrument(
            "Lower threshold must be greater than zero.".into(),
        ));
    }
    if lower >= upper {
        return Err(MonitorError::InvalidInstrument(
            "Lower threshold must be less than upper threshold.".into(),
        ));
    }

    Ok(MonitoredInstrument::new(sym, lower, upper))
}

/// What changed between two versions of the watch list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstrumentChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub edited: Vec<String>,
}

impl InstrumentChanges {
    pub fn diff(old: &[MonitoredInstrument], new: &[MonitoredInstrument]) -> Self {
        let before: HashMap<&str, &MonitoredInstrument> =
            old.iter().map(|i| (i.symbol.as_str(), i)).collect();
        let after: HashMap<&str, &MonitoredInstrument> =
            new.iter().map(|i| (i.symbol.as_str(), i)).collect();

        let mut changes = InstrumentChanges::default();

        for inst in new {
            match before.get(inst.symbol.as_str()) {
                None => changes.added.push(inst.symbol.clone()),
                Some(prev) if !prev.same_thresholds(inst) => {
                    changes.edited.push(inst.symbol.clone())
                }
                Some(_) => {}
            }
        }

        for inst in old {
            if !after.contains_key(inst.symbol.as_str()) {
                changes.removed.push(inst.symbol.clone());
            }
        }

        changes
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.edited.is_empty()
    }
}

pub async fn load_instruments(storage: &dyn Storage) -> Result<Vec<MonitoredInstrument>> {
    match storage.get(STOCKS_KEY).await? {
        Some(v) => Ok(serde_json::from_value(v)?),
        None => Ok(Vec::new()),
    }
}

pub async fn save_instruments(storage: &dyn Storage, list: &[MonitoredInstrument]) -> Result<()> {
    storage.set(STOCKS_KEY, serde_json::to_value(list)?).await
}

pub async fn list(state: &AppState) -> Result<Vec<MonitoredInstrument>> {
    load_instruments(state.storage.as_ref()).await
}

async fn replace_list<F>(state: &AppState, edit: F) -> Result<Vec<MonitoredInstrument>>
where
    F: FnOnce(&mut Vec<MonitoredInstrument>),
{
    // hold the engine for the whole edit so no cycle sees half of it
    let mut monitor = state.monitor.lock().await;

    let old = load_instruments(state.storage.as_ref()).await?;
    let mut new = old.clone();
    edit(&mut new);

    save_instruments(state.storage.as_ref(), &new).await?;
    monitor.on_instruments_changed(&old, &new);
    drop(monitor);

    let _ = state.events_tx.send(ServerEvent::signal("instrumentsUpdated"));

    Ok(new)
}

/// Adds the instrument, or replaces the thresholds of an existing one in place.
pub async fn upsert(
    state: &AppState,
    symbol: &str,
    lower: f64,
    upper: f64,
) -> Result<MonitoredInstrument> {
    let inst = match validate(symbol, lower, upper) {
        Ok(i) => i,
        Err(e) => {
            state
                .activity
                .error(format!("Failed to add stock: {e}"));
            return Err(e);
        }
    };

    let saved = inst.clone();
    let mut updated = false;
    replace_list(state, |list| {
        if let Some(existing) = list.iter_mut().find(|i| i.symbol == inst.symbol) {
            *existing = inst;
            updated = true;
        } else {
            list.push(inst);
        }
    })
    .await?;

    if updated {
        state
            .activity
            .info(format!("Updated existing stock: {}", saved.symbol));
    } else {
        state
            .activity
            .success(format!("Added new stock: {}", saved.symbol));
    }

    Ok(saved)
}

/// Returns whether the symbol was being monitored.
pub async fn remove(state: &AppState, symbol: &str) -> Result<bool> {
    let sym = symbol.trim().to_uppercase();
    let mut removed = None;

    replace_list(state, |list| {
        if let Some(pos) = list.iter().position(|i| i.symbol == sym) {
            removed = Some(list.remove(pos));
        }
    })
    .await?;

    if let Some(inst) = &removed {
        state.activity.warning(format!(
            "Stock {} deleted (Thresholds: {} - {})",
            inst.symbol, inst.lower_threshold, inst.upper_threshold
        ));
    }

    Ok(removed.is_some())
}

pub async fn clear_all(state: &AppState) -> Result<()> {
    replace_list(state, |list| list.clear()).await?;
    state.activity.info("All stocks cleared");
    Ok(())
}
