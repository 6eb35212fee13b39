use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::Settings,
    error::{MonitorError, Result},
    services::price_source::PriceSource,
};

#[derive(Clone)]
pub struct FinnhubClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl FinnhubClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.finnhub_api_key.clone(),
            settings.finnhub_base_url.clone(),
            Duration::from_secs(settings.fetch_timeout_secs),
        )
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub async fn quote(&self, symbol: &str) -> Result<QuoteResponse> {
        if !self.has_key() {
            return Err(MonitorError::fetch(symbol, "FINNHUB_API_KEY is missing in .env"));
        }

        let url = format!("{}/quote", self.base_url);
        let res = self
            .http
            .get(url)
            .query(&[("symbol", symbol), ("token", &self.api_key)])
            .send()
            .await
            .map_err(|e| MonitorError::fetch(symbol, e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(MonitorError::fetch(
                symbol,
                format!("Finnhub quote failed: {status} {body}"),
            ));
        }

        res.json::<QuoteResponse>()
            .await
            .map_err(|e| MonitorError::fetch(symbol, e.to_string()))
    }
}

#[async_trait]
impl PriceSource for FinnhubClient {
    async fn fetch_price(&self, symbol: &str) -> Result<f64> {
        let quote = self.quote(symbol).await?;
        tracing::debug!(symbol, price = quote.c, change = ?quote.d, pct = ?quote.dp, "quote received");

        // Finnhub answers unknown symbols with an all-zero quote
        let price = quote.c;
        if !price.is_finite() || price <= 0.0 {
            return Err(MonitorError::fetch(symbol, format!("no usable price in quote ({price})")));
        }

        Ok(price)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuoteResponse {
    // current
    pub c: f64,
    // change
    #[serde(default)]
    pub d: Option<f64>,
    // percent change
    #[serde(default)]
    pub dp: Option<f64>,
    // high
    #[serde(default)]
    pub h: f64,
    // low
    #[serde(default)]
    pub l: f64,
    // open
    #[serde(default)]
    pub o: f64,
    // previous close
    #[serde(default)]
    pub pc: f64,
    // timestamp
    #[serde(default)]
    pub t: i64,
}
