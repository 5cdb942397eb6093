//! Incremental, resumable backfill of weekly funding-rate history.
//!
//! One pass walks every snapshot date not yet present in the funding table,
//! in order, and commits each snapshot's rows as a single transaction. The
//! table's latest snapshot date is the only resume state: a snapshot that
//! failed to commit is retried from scratch on the next run, a committed one
//! is never revisited.

use crate::errors::{BackfillError, ExchangeError};
use crate::exchanges::{Exchange, pair_for};
use crate::gate::is_complete_week;
use crate::models::{FundingObservation, PersistedRow, RankedSymbol, WeekWindow};
use crate::store::{RateStore, SnapshotSource};
use crate::symbols;
use chrono::{Days, NaiveDate};

pub mod mark_price;

/// Spacing of market-cap snapshots.
pub const SNAPSHOT_INTERVAL: Days = Days::new(7);

/// First snapshot date to process, given the latest one already stored.
pub fn resume_date(last_stored: Option<NaiveDate>, data_start: NaiveDate) -> NaiveDate {
    match last_stored {
        Some(last) if last >= data_start => last + SNAPSHOT_INTERVAL,
        _ => data_start,
    }
}

/// What happened to one symbol's week.
#[derive(Debug)]
pub enum SymbolOutcome {
    Accepted(Vec<FundingObservation>),
    /// Fewer settlements than a full week; carries the count received.
    Incomplete(usize),
    /// The exchange rejected the request; the rest of the run is unaffected.
    Skipped(ExchangeError),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BackfillSummary {
    pub snapshots: usize,
    pub rows_inserted: u64,
    pub symbols_accepted: usize,
    pub symbols_incomplete: usize,
    pub symbols_skipped: usize,
}

pub struct Backfill<'a> {
    exchange: &'a dyn Exchange,
    snapshots: &'a dyn SnapshotSource,
    rates: &'a dyn RateStore,
    top_n: usize,
    data_start_date: NaiveDate,
}

impl<'a> Backfill<'a> {
    pub fn new(
        exchange: &'a dyn Exchange,
        snapshots: &'a dyn SnapshotSource,
        rates: &'a dyn RateStore,
        top_n: usize,
        data_start_date: NaiveDate,
    ) -> Self {
        Self {
            exchange,
            snapshots,
            rates,
            top_n,
            data_start_date,
        }
    }

    pub async fn run(&self) -> Result<BackfillSummary, BackfillError> {
        self.rates.ensure_table().await?;

        let last_stored = self.rates.last_snapshot_date().await?;
        let start = resume_date(last_stored, self.data_start_date);
        tracing::info!(?last_stored, %start, "Starting queries at snapshot date {start}");

        match self.exchange.check_access().await {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                tracing::warn!("[{}] preflight request failed: {e}", self.exchange.name());
            }
            Err(e) => return Err(e.into()),
        }

        let pending = self.snapshots.snapshot_dates_from(start).await?;
        tracing::info!("{} snapshot(s) pending", pending.len());

        let mut summary = BackfillSummary::default();
        for date in pending {
            self.process_snapshot(date, &mut summary).await?;
            summary.snapshots += 1;
        }

        tracing::info!(
            snapshots = summary.snapshots,
            rows = summary.rows_inserted,
            accepted = summary.symbols_accepted,
            incomplete = summary.symbols_incomplete,
            skipped = summary.symbols_skipped,
            "Funding table has caught up with the snapshot table"
        );
        Ok(summary)
    }

    async fn process_snapshot(
        &self,
        date: NaiveDate,
        summary: &mut BackfillSummary,
    ) -> Result<(), BackfillError> {
        let resolved = symbols::resolve(self.snapshots, date).await?;
        let window = WeekWindow::starting(date);

        tracing::info!(snapshot = %date, candidates = resolved.len(), "Processing snapshot");

        let mut queued = Vec::new();
        let mut accepted = 0;

        for ranked in &resolved {
            if accepted >= self.top_n {
                break;
            }

            match self.fetch_symbol(ranked, window).await? {
                SymbolOutcome::Accepted(observations) => {
                    accepted += 1;
                    queued.extend(observations);
                }
                SymbolOutcome::Incomplete(count) => {
                    tracing::debug!(
                        snapshot = %date,
                        symbol = %ranked.ticker,
                        count,
                        "Incomplete week, skipping"
                    );
                    summary.symbols_incomplete += 1;
                }
                SymbolOutcome::Skipped(e) => {
                    tracing::warn!(
                        snapshot = %date,
                        symbol = %ranked.ticker,
                        "Skipping symbol: {e}"
                    );
                    summary.symbols_skipped += 1;
                }
            }
        }

        let rows = build_rows(&resolved, date, queued)?;
        if rows.is_empty() {
            tracing::warn!(snapshot = %date, "No symbol had a complete week; nothing to insert");
            return Ok(());
        }

        let inserted = self.rates.insert_snapshot(&rows).await?;
        if inserted < rows.len() as u64 {
            tracing::warn!(
                snapshot = %date,
                "{} row(s) were already present",
                rows.len() as u64 - inserted
            );
        }
        tracing::info!(
            snapshot = %date,
            symbols = accepted,
            "Successfully inserted {inserted} rows"
        );

        summary.symbols_accepted += accepted;
        summary.rows_inserted += inserted;
        Ok(())
    }

    async fn fetch_symbol(
        &self,
        ranked: &RankedSymbol,
        window: WeekWindow,
    ) -> Result<SymbolOutcome, BackfillError> {
        let pair = pair_for(&ranked.ticker);

        match self.exchange.fetch_funding_history(&pair, window).await {
            Ok(observations) if is_complete_week(&observations) => {
                Ok(SymbolOutcome::Accepted(observations))
            }
            Ok(observations) => Ok(SymbolOutcome::Incomplete(observations.len())),
            Err(e) if e.is_recoverable() => Ok(SymbolOutcome::Skipped(e)),
            Err(e) => Err(e.into()),
        }
    }
}

/// Attaches snapshot date and rank to each observation by matching its pair
/// back against the resolved symbols.
pub fn build_rows(
    resolved: &[RankedSymbol],
    date: NaiveDate,
    observations: Vec<FundingObservation>,
) -> Result<Vec<PersistedRow>, BackfillError> {
    observations
        .into_iter()
        .map(|observation| {
            let ranked = symbols::match_pair(resolved, &observation.pair).ok_or_else(|| {
                BackfillError::UnresolvedSymbol {
                    symbol: observation.pair.clone(),
                    snapshot: date,
                }
            })?;

            Ok(PersistedRow {
                funding_time: observation.funding_time,
                symbol: ranked.symbol.clone(),
                funding_rate: observation.funding_rate,
                mark_price: observation.mark_price,
                snapshot_date: date,
                rank: ranked.rank,
            })
        })
        .collect()
}
