use super::{RateStore, SnapshotSource};
use crate::config::{Config, TableName};
use crate::errors::StoreError;
use crate::models::{MarkPriceSample, PersistedRow, WeekWindow};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Postgres-backed snapshot source and funding-rate table. Table names are
/// validated identifiers; every other value is a bound parameter.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    snapshots_table: TableName,
    funding_table: TableName,
}

impl PgStore {
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        // one writer, strictly sequential
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&config.database_url)
            .await?;

        tracing::info!("DB connected successfully");

        Ok(Self::new(
            pool,
            config.snapshots_table.clone(),
            config.funding_table.clone(),
        ))
    }

    pub fn new(pool: PgPool, snapshots_table: TableName, funding_table: TableName) -> Self {
        Self {
            pool,
            snapshots_table,
            funding_table,
        }
    }

    pub fn funding_table(&self) -> &TableName {
        &self.funding_table
    }
}

#[async_trait]
impl SnapshotSource for PgStore {
    async fn snapshot_dates_from(&self, from: NaiveDate) -> Result<Vec<NaiveDate>, StoreError> {
        let query = format!(
            "SELECT DISTINCT snapshot_date FROM {} WHERE snapshot_date >= $1 ORDER BY snapshot_date ASC",
            self.snapshots_table
        );

        let dates = sqlx::query_scalar::<_, NaiveDate>(&query)
            .bind(from)
            .fetch_all(&self.pool)
            .await?;
        Ok(dates)
    }

    async fn ranked_symbols(
        &self,
        date: NaiveDate,
        excluded: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let query = format!(
            r#"
            SELECT symbol FROM {}
            WHERE snapshot_date = $1 AND NOT (symbol = ANY($2))
            GROUP BY symbol, rank
            ORDER BY rank ASC, symbol ASC
            "#,
            self.snapshots_table
        );

        let symbols = sqlx::query_scalar::<_, String>(&query)
            .bind(date)
            .bind(excluded)
            .fetch_all(&self.pool)
            .await?;
        Ok(symbols)
    }

    async fn rank_of(&self, date: NaiveDate, symbol: &str) -> Result<Option<i32>, StoreError> {
        let query = format!(
            "SELECT rank::INTEGER FROM {} WHERE snapshot_date = $1 AND symbol = $2 ORDER BY rank ASC LIMIT 1",
            self.snapshots_table
        );

        let rank = sqlx::query_scalar::<_, Option<i32>>(&query)
            .bind(date)
            .bind(symbol)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rank.flatten())
    }
}

#[async_trait]
impl RateStore for PgStore {
    async fn ensure_table(&self) -> Result<(), StoreError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {funding} (
                funding_time BIGINT NOT NULL,
                symbol TEXT,
                funding_rate DECIMAL NOT NULL,
                mark_price DECIMAL,
                snapshot_date DATE,
                rank INTEGER,

                PRIMARY KEY (symbol, funding_time),
                FOREIGN KEY (snapshot_date, rank, symbol)
                    REFERENCES {snapshots} (snapshot_date, rank, symbol)
            )
            "#,
            funding = self.funding_table,
            snapshots = self.snapshots_table
        );

        sqlx::query(&query).execute(&self.pool).await?;
        tracing::info!("Table {} is ready", self.funding_table);
        Ok(())
    }

    async fn last_snapshot_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        let query = format!("SELECT MAX(snapshot_date) FROM {}", self.funding_table);

        let date = sqlx::query_scalar::<_, Option<NaiveDate>>(&query)
            .fetch_one(&self.pool)
            .await?;
        Ok(date)
    }

    async fn insert_snapshot(&self, rows: &[PersistedRow]) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let query = format!(
            r#"
            INSERT INTO {}
                (funding_time, symbol, funding_rate, mark_price, snapshot_date, rank)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (symbol, funding_time) DO NOTHING
            "#,
            self.funding_table
        );

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for row in rows {
            let result = sqlx::query(&query)
                .bind(row.funding_time)
                .bind(&row.symbol)
                .bind(row.funding_rate)
                .bind(row.mark_price)
                .bind(row.snapshot_date)
                .bind(row.rank)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn snapshots_missing_mark_price(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let query = format!(
            "SELECT DISTINCT snapshot_date FROM {} WHERE mark_price IS NULL ORDER BY snapshot_date ASC",
            self.funding_table
        );

        let dates = sqlx::query_scalar::<_, NaiveDate>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(dates)
    }

    async fn symbols_missing_mark_price(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<String>, StoreError> {
        let query = format!(
            r#"
            SELECT DISTINCT symbol FROM {}
            WHERE snapshot_date = $1 AND mark_price IS NULL
            ORDER BY symbol ASC
            "#,
            self.funding_table
        );

        let symbols = sqlx::query_scalar::<_, String>(&query)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(symbols)
    }

    async fn fill_mark_prices(
        &self,
        date: NaiveDate,
        symbol: &str,
        samples: &[MarkPriceSample],
    ) -> Result<u64, StoreError> {
        let query = format!(
            r#"
            UPDATE {}
            SET mark_price = $1
            WHERE symbol = $2 AND snapshot_date = $3 AND mark_price IS NULL
              AND funding_time >= $4 AND funding_time < $5
            "#,
            self.funding_table
        );

        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for sample in samples {
            let result = sqlx::query(&query)
                .bind(sample.open_price)
                .bind(symbol)
                .bind(date)
                .bind(sample.open_time)
                .bind(sample.open_time + WeekWindow::FUNDING_INTERVAL_MS)
                .execute(&mut *tx)
                .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }
}
