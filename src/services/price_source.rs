use async_trait::async_trait;

use crate::error::Result;

/// Current price lookup for one symbol. Any failure is a `MonitorError::Fetch`.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<f64>;
}
