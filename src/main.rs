mod backfill;
mod config;
mod errors;
mod exchanges;
mod gate;
mod models;
mod store;
mod symbols;

#[cfg(test)]
mod testing;

use backfill::Backfill;
use backfill::mark_price::MarkPriceBackfill;
use config::{Config, LogFormat};
use exchanges::Exchange;
use exchanges::binance::Binance;
use store::PgStore;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        "Funding backfill starting: top {} from {} into {}",
        config.top_n,
        config.data_start_date,
        config.funding_table
    );

    // ── 1. Connect collaborators ───────────────────────────────────
    let store = PgStore::connect(&config).await?;
    let exchange = Binance::new(&config)?;

    // ── 2. Catch the funding table up with the snapshot table ──────
    let summary = Backfill::new(
        &exchange,
        &store,
        &store,
        config.top_n,
        config.data_start_date,
    )
    .run()
    .await?;

    tracing::info!(
        "[{}] Insertions to {} caught up: {} snapshot(s), {} row(s)",
        exchange.name(),
        store.funding_table(),
        summary.snapshots,
        summary.rows_inserted
    );

    // ── 3. Fill mark prices the funding endpoint left empty ────────
    if config.skip_mark_price_pass {
        tracing::info!("Mark price pass disabled");
    } else {
        MarkPriceBackfill::new(&exchange, &store).run().await?;
    }

    Ok(())
}
