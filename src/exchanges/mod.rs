use crate::errors::ExchangeError;
use crate::models::{FundingObservation, MarkPriceSample, WeekWindow};
use async_trait::async_trait;

pub mod binance;
mod pacer;

pub use pacer::Pacer;

/// Quote asset every tracked perpetual is margined in.
pub const QUOTE_ASSET: &str = "USDT";

#[async_trait]
pub trait Exchange: Send + Sync {
    fn name(&self) -> &'static str;

    /// One preflight request. Fails with `Geoblocked` if the exchange refuses
    /// to serve this network origin at all.
    async fn check_access(&self) -> Result<(), ExchangeError>;

    /// Funding settlements for `pair` inside `window`, oldest first.
    async fn fetch_funding_history(
        &self,
        pair: &str,
        window: WeekWindow,
    ) -> Result<Vec<FundingObservation>, ExchangeError>;

    /// 8h mark-price klines for `pair` inside `window`.
    async fn fetch_mark_price_klines(
        &self,
        pair: &str,
        window: WeekWindow,
    ) -> Result<Vec<MarkPriceSample>, ExchangeError>;
}

/// "BTC" -> "BTCUSDT"
pub fn pair_for(ticker: &str) -> String {
    format!("{ticker}{QUOTE_ASSET}")
}

/// "BTCUSDT" -> Some("BTC")
pub fn ticker_of(pair: &str) -> Option<&str> {
    pair.strip_suffix(QUOTE_ASSET).filter(|t| !t.is_empty())
}
