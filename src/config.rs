use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub finnhub_api_key: String,
    pub finnhub_base_url: String,
    pub fetch_timeout_secs: u64,

    pub storage_path: String,

    pub poll_interval_secs: u64,
    pub analysis_cooldown_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            finnhub_api_key: String::new(),
            finnhub_base_url: "https://finnhub.io/api/v1".to_string(),
            fetch_timeout_secs: 10,
            storage_path: "data/stockwatch.json".to_string(),
            poll_interval_secs: 60,
            analysis_cooldown_secs: 15 * 60,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let defaults = Settings::default();

    let host = env::var("HOST").unwrap_or(defaults.host);
    let port = parse_or("PORT", defaults.port);

    let finnhub_api_key = env::var("FINNHUB_API_KEY").unwrap_or_default();
    let finnhub_base_url = env::var("FINNHUB_BASE_URL").unwrap_or(defaults.finnhub_base_url);
    let fetch_timeout_secs = parse_or("FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs);

    let storage_path = env::var("STORAGE_PATH").unwrap_or(defaults.storage_path);

    // a zero interval would make tokio's interval panic
    let poll_interval_secs = parse_or("POLL_INTERVAL_SECS", defaults.poll_interval_secs).max(1);
    let analysis_cooldown_secs =
        parse_or("ANALYSIS_COOLDOWN_SECS", defaults.analysis_cooldown_secs);

    Settings {
        host,
        port,
        finnhub_api_key,
        finnhub_base_url,
        fetch_timeout_secs,
        storage_path,
        poll_interval_secs,
        analysis_cooldown_secs,
    }
}
