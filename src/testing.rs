//! In-memory stand-ins for the snapshot table, the funding table and the
//! exchange, used by unit tests.

use crate::errors::{ExchangeError, StoreError};
use crate::exchanges::Exchange;
use crate::models::{FundingObservation, MarkPriceSample, PersistedRow, WeekWindow};
use crate::store::{RateStore, SnapshotSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeSnapshots {
    snapshots: BTreeMap<NaiveDate, Vec<(String, i32)>>,
}

impl FakeSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, date: NaiveDate, ranks: &[(&str, i32)]) -> Self {
        let mut entries: Vec<(String, i32)> =
            ranks.iter().map(|(s, r)| (s.to_string(), *r)).collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        self.snapshots.insert(date, entries);
        self
    }
}

#[async_trait]
impl SnapshotSource for FakeSnapshots {
    async fn snapshot_dates_from(&self, from: NaiveDate) -> Result<Vec<NaiveDate>, StoreError> {
        Ok(self.snapshots.range(from..).map(|(d, _)| *d).collect())
    }

    async fn ranked_symbols(
        &self,
        date: NaiveDate,
        excluded: &[String],
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .snapshots
            .get(&date)
            .into_iter()
            .flatten()
            .filter(|(symbol, _)| !excluded.contains(symbol))
            .map(|(symbol, _)| symbol.clone())
            .collect())
    }

    async fn rank_of(&self, date: NaiveDate, symbol: &str) -> Result<Option<i32>, StoreError> {
        Ok(self
            .snapshots
            .get(&date)
            .and_then(|entries| entries.iter().find(|(s, _)| s == symbol))
            .map(|(_, rank)| *rank))
    }
}

#[derive(Default)]
pub struct FakeRateStore {
    pub rows: Mutex<Vec<PersistedRow>>,
    pub batches: Mutex<Vec<NaiveDate>>,
    pub fail_inserts: bool,
}

impl FakeRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<PersistedRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<PersistedRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateStore for FakeRateStore {
    async fn ensure_table(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn last_snapshot_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().map(|r| r.snapshot_date).max())
    }

    async fn insert_snapshot(&self, rows: &[PersistedRow]) -> Result<u64, StoreError> {
        if self.fail_inserts {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut stored = self.rows.lock().unwrap();
        let mut inserted = 0;
        for row in rows {
            let exists = stored
                .iter()
                .any(|r| r.symbol == row.symbol && r.funding_time == row.funding_time);
            if !exists {
                stored.push(row.clone());
                inserted += 1;
            }
        }

        if let Some(first) = rows.first() {
            self.batches.lock().unwrap().push(first.snapshot_date);
        }
        Ok(inserted)
    }

    async fn snapshots_missing_mark_price(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let mut dates: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.mark_price.is_none())
            .map(|r| r.snapshot_date)
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    async fn symbols_missing_mark_price(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<String>, StoreError> {
        let mut symbols: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.snapshot_date == date && r.mark_price.is_none())
            .map(|r| r.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    async fn fill_mark_prices(
        &self,
        date: NaiveDate,
        symbol: &str,
        samples: &[MarkPriceSample],
    ) -> Result<u64, StoreError> {
        let mut updated = 0;
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.snapshot_date != date || row.symbol != symbol || row.mark_price.is_some() {
                continue;
            }
            let bucket = samples.iter().find(|s| {
                row.funding_time >= s.open_time
                    && row.funding_time < s.open_time + WeekWindow::FUNDING_INTERVAL_MS
            });
            if let Some(sample) = bucket {
                row.mark_price = Some(sample.open_price);
                updated += 1;
            }
        }
        Ok(updated)
    }
}

/// What the fake exchange answers for one pair.
#[derive(Clone)]
pub enum FakeResponse {
    Funding(Vec<FundingObservation>),
    Klines(Vec<MarkPriceSample>),
    Status(u16),
    Transport,
}

#[derive(Default)]
pub struct FakeExchange {
    responses: HashMap<String, FakeResponse>,
    geoblocked: bool,
    preflight_status: Option<u16>,
    pub calls: Mutex<Vec<(String, WeekWindow)>>,
    pub preflights: Mutex<usize>,
}

impl FakeExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geoblocked() -> Self {
        Self {
            geoblocked: true,
            ..Self::default()
        }
    }

    /// Preflight answers with an HTTP error status instead of succeeding.
    pub fn with_preflight_status(code: u16) -> Self {
        Self {
            preflight_status: Some(code),
            ..Self::default()
        }
    }

    pub fn respond(mut self, pair: &str, response: FakeResponse) -> Self {
        self.responses.insert(pair.to_string(), response);
        self
    }

    pub fn called_pairs(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    fn answer(&self, pair: &str, window: WeekWindow) -> Result<FakeResponse, ExchangeError> {
        self.calls.lock().unwrap().push((pair.to_string(), window));

        match self.responses.get(pair).cloned() {
            // unknown symbol, as Binance answers it
            None => Err(status_error(400)),
            Some(FakeResponse::Status(code)) => Err(status_error(code)),
            Some(FakeResponse::Transport) => Err(transport_error()),
            Some(other) => Ok(other),
        }
    }
}

fn status_error(code: u16) -> ExchangeError {
    ExchangeError::Status {
        status: reqwest::StatusCode::from_u16(code).unwrap(),
        body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
    }
}

fn transport_error() -> ExchangeError {
    // an unparseable URL is the simplest way to get a real reqwest::Error
    let err = reqwest::Client::new().get("not a url").build().unwrap_err();
    ExchangeError::Http(err)
}

#[async_trait]
impl Exchange for FakeExchange {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn check_access(&self) -> Result<(), ExchangeError> {
        *self.preflights.lock().unwrap() += 1;
        if self.geoblocked {
            return Err(ExchangeError::Geoblocked(
                "Service unavailable from a restricted location".to_string(),
            ));
        }
        match self.preflight_status {
            Some(code) => Err(status_error(code)),
            None => Ok(()),
        }
    }

    async fn fetch_funding_history(
        &self,
        pair: &str,
        window: WeekWindow,
    ) -> Result<Vec<FundingObservation>, ExchangeError> {
        match self.answer(pair, window)? {
            FakeResponse::Funding(observations) => Ok(observations),
            _ => Ok(Vec::new()),
        }
    }

    async fn fetch_mark_price_klines(
        &self,
        pair: &str,
        window: WeekWindow,
    ) -> Result<Vec<MarkPriceSample>, ExchangeError> {
        match self.answer(pair, window)? {
            FakeResponse::Klines(samples) => Ok(samples),
            _ => Ok(Vec::new()),
        }
    }
}

/// `count` settlements for `pair`, one every 8h from the start of `date`'s week.
pub fn funding_week(pair: &str, date: NaiveDate, count: usize) -> Vec<FundingObservation> {
    let window = WeekWindow::starting(date);
    (0..count as i64)
        .map(|i| FundingObservation {
            pair: pair.to_string(),
            funding_time: window.start_ms + i * WeekWindow::FUNDING_INTERVAL_MS,
            funding_rate: Decimal::new(1, 4),
            mark_price: None,
        })
        .collect()
}

/// `count` 8h klines starting at `date`, opening at `price`.
pub fn kline_week(date: NaiveDate, count: usize, price: Decimal) -> Vec<MarkPriceSample> {
    let window = WeekWindow::starting(date);
    (0..count as i64)
        .map(|i| MarkPriceSample {
            open_time: window.start_ms + i * WeekWindow::FUNDING_INTERVAL_MS,
            open_price: price,
        })
        .collect()
}
