use super::{Exchange, Pacer};
use crate::config::Config;
use crate::errors::ExchangeError;
use crate::models::{FundingObservation, MarkPriceSample, WeekWindow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Marker Binance puts in the `msg` of every response served to a blocked region.
const RESTRICTED_LOCATION: &str = "restricted location";

/// The raw JSON shape of one entry from /fapi/v1/fundingRate
#[derive(Debug, Deserialize)]
struct FundingRateResponse {
    symbol: String,

    #[serde(rename = "fundingTime")]
    funding_time: i64,

    #[serde(rename = "fundingRate")]
    funding_rate: String,

    // "" (or missing) for settlements before Binance started publishing it
    #[serde(rename = "markPrice", default)]
    mark_price: Option<String>,
}

/// Error body Binance returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    msg: Option<String>,
}

pub struct Binance {
    client: reqwest::Client,
    base_url: String,
    funding_pacer: Pacer,
    kline_pacer: Pacer,
}

impl Binance {
    pub fn new(config: &Config) -> Result<Self, ExchangeError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.binance_url.clone(),
            funding_pacer: Pacer::new(config.funding_request_delay),
            kline_pacer: Pacer::new(config.kline_request_delay),
        })
    }

    /// GETs `url` and returns the body of a 2xx response. Non-2xx responses
    /// become `Status` errors, or `Geoblocked` if the body says so.
    async fn get_body(&self, url: &str) -> Result<String, ExchangeError> {
        tracing::debug!("[{}] GET {url}", self.name());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        check_restricted(&body)?;

        if !status.is_success() {
            return Err(ExchangeError::Status { status, body });
        }

        Ok(body)
    }
}

/// Fails with `Geoblocked` if `body` is Binance's restricted-location notice.
fn check_restricted(body: &str) -> Result<(), ExchangeError> {
    if let Ok(ApiMessage { msg: Some(msg) }) = serde_json::from_str::<ApiMessage>(body) {
        if msg.contains(RESTRICTED_LOCATION) {
            return Err(ExchangeError::Geoblocked(msg));
        }
    }
    Ok(())
}

fn parse_decimal(raw: &str, what: &str) -> Result<Decimal, ExchangeError> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ExchangeError::UnexpectedData(format!("invalid {what}: {raw:?}")))
}

fn parse_funding_history(body: &str) -> Result<Vec<FundingObservation>, ExchangeError> {
    let entries: Vec<FundingRateResponse> = serde_json::from_str(body)?;

    entries
        .into_iter()
        .map(|entry| {
            let funding_rate = parse_decimal(&entry.funding_rate, "funding rate")?;
            let mark_price = match entry.mark_price.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(parse_decimal(raw, "mark price")?),
            };

            Ok(FundingObservation {
                pair: entry.symbol,
                funding_time: entry.funding_time,
                funding_rate,
                mark_price,
            })
        })
        .collect()
}

/// Klines arrive as positional arrays: `[openTime, open, high, low, close, ...]`.
fn parse_mark_price_klines(body: &str) -> Result<Vec<MarkPriceSample>, ExchangeError> {
    let rows: Vec<Vec<serde_json::Value>> = serde_json::from_str(body)?;

    rows.iter()
        .map(|row| {
            let open_time = row
                .first()
                .and_then(serde_json::Value::as_i64)
                .ok_or_else(|| ExchangeError::UnexpectedData("kline without open time".into()))?;
            let open = row
                .get(1)
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| ExchangeError::UnexpectedData("kline without open price".into()))?;

            Ok(MarkPriceSample {
                open_time,
                open_price: parse_decimal(open, "kline open price")?,
            })
        })
        .collect()
}

#[async_trait]
impl Exchange for Binance {
    fn name(&self) -> &'static str {
        "binance"
    }

    async fn check_access(&self) -> Result<(), ExchangeError> {
        let url = format!("{}/fapi/v1/fundingRate", self.base_url);

        self.funding_pacer.wait().await;
        self.get_body(&url).await.map(|_| ())
    }

    /// Hits the fundingRate history endpoint once for the whole week. A week
    /// holds 21 settlements, well under the endpoint's default page of 100.
    async fn fetch_funding_history(
        &self,
        pair: &str,
        window: WeekWindow,
    ) -> Result<Vec<FundingObservation>, ExchangeError> {
        let url = format!(
            "{}/fapi/v1/fundingRate?symbol={}&startTime={}&endTime={}",
            self.base_url,
            pair,
            window.start_ms,
            window.last_ms()
        );

        self.funding_pacer.wait().await;
        let body = self.get_body(&url).await?;

        let observations = parse_funding_history(&body)?;
        Ok(observations
            .into_iter()
            .filter(|o| window.contains(o.funding_time))
            .collect())
    }

    async fn fetch_mark_price_klines(
        &self,
        pair: &str,
        window: WeekWindow,
    ) -> Result<Vec<MarkPriceSample>, ExchangeError> {
        let url = format!(
            "{}/fapi/v1/markPriceKlines?symbol={}&interval=8h&limit=21&startTime={}&endTime={}",
            self.base_url,
            pair,
            window.start_ms,
            window.last_ms()
        );

        self.kline_pacer.wait().await;
        let body = self.get_body(&url).await?;

        parse_mark_price_klines(&body)
    }
}
