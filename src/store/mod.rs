use crate::errors::StoreError;
use crate::models::{MarkPriceSample, PersistedRow};
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod postgres;

pub use postgres::PgStore;

/// Read side of the externally owned market-cap snapshot table.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Distinct snapshot dates on or after `from`, ascending.
    async fn snapshot_dates_from(&self, from: NaiveDate) -> Result<Vec<NaiveDate>, StoreError>;

    /// Symbols ranked at `date`, minus `excluded`, ascending by rank.
    async fn ranked_symbols(
        &self,
        date: NaiveDate,
        excluded: &[String],
    ) -> Result<Vec<String>, StoreError>;

    /// Rank of `symbol` at `date`. `None` if the snapshot has no such row.
    async fn rank_of(&self, date: NaiveDate, symbol: &str) -> Result<Option<i32>, StoreError>;
}

/// The funding-rate table this program owns.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Creates the table if it does not exist yet.
    async fn ensure_table(&self) -> Result<(), StoreError>;

    async fn last_snapshot_date(&self) -> Result<Option<NaiveDate>, StoreError>;

    /// Writes every row of one snapshot in a single transaction. Returns the
    /// number of rows actually inserted; rows whose (symbol, funding_time)
    /// already exist are skipped.
    async fn insert_snapshot(&self, rows: &[PersistedRow]) -> Result<u64, StoreError>;

    /// Snapshot dates with at least one row lacking a mark price, ascending.
    async fn snapshots_missing_mark_price(&self) -> Result<Vec<NaiveDate>, StoreError>;

    async fn symbols_missing_mark_price(&self, date: NaiveDate)
    -> Result<Vec<String>, StoreError>;

    /// Sets the mark price of `symbol`'s rows at `date` that are still null,
    /// taking each row's value from the kline whose 8h bucket holds its
    /// funding time. Returns the number of rows updated.
    async fn fill_mark_prices(
        &self,
        date: NaiveDate,
        symbol: &str,
        samples: &[MarkPriceSample],
    ) -> Result<u64, StoreError>;
}
