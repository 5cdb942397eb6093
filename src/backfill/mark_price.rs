//! Fills in mark prices the funding endpoint did not publish, using the
//! opening price of each 8h mark-price kline.

use crate::errors::BackfillError;
use crate::exchanges::{Exchange, pair_for};
use crate::gate::is_complete_week;
use crate::models::WeekWindow;
use crate::store::RateStore;
use crate::symbols::exchange_ticker;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkPriceSummary {
    pub rows_filled: u64,
    pub symbols_filled: usize,
    pub symbols_skipped: usize,
}

pub struct MarkPriceBackfill<'a> {
    exchange: &'a dyn Exchange,
    rates: &'a dyn RateStore,
}

impl<'a> MarkPriceBackfill<'a> {
    pub fn new(exchange: &'a dyn Exchange, rates: &'a dyn RateStore) -> Self {
        Self { exchange, rates }
    }

    /// Best effort: a symbol the exchange has no usable klines for is logged
    /// and left null. Only transport and database failures end the pass.
    pub async fn run(&self) -> Result<MarkPriceSummary, BackfillError> {
        let mut summary = MarkPriceSummary::default();

        let dates = self.rates.snapshots_missing_mark_price().await?;
        tracing::info!("{} snapshot(s) have rows without a mark price", dates.len());

        for date in dates {
            let window = WeekWindow::starting(date);

            for symbol in self.rates.symbols_missing_mark_price(date).await? {
                let pair = pair_for(&exchange_ticker(&symbol));

                let samples = match self.exchange.fetch_mark_price_klines(&pair, window).await {
                    Ok(samples) => samples,
                    Err(e) if e.is_recoverable() => {
                        tracing::warn!(snapshot = %date, %symbol, "Mark price klines failed: {e}");
                        summary.symbols_skipped += 1;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                if !is_complete_week(&samples) {
                    tracing::info!(
                        snapshot = %date,
                        %symbol,
                        count = samples.len(),
                        "Skipping entry. Not enough mark price data"
                    );
                    summary.symbols_skipped += 1;
                    continue;
                }

                let filled = self.rates.fill_mark_prices(date, &symbol, &samples).await?;
                tracing::debug!(snapshot = %date, %symbol, filled, "Filled mark prices");

                summary.rows_filled += filled;
                summary.symbols_filled += 1;
            }
        }

        tracing::info!(
            rows = summary.rows_filled,
            symbols = summary.symbols_filled,
            skipped = summary.symbols_skipped,
            "Mark price backfill finished"
        );
        Ok(summary)
    }
}
