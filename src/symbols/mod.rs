//! Maps a snapshot's market-cap ranking onto exchange tickers.

use crate::errors::StoreError;
use crate::exchanges::ticker_of;
use crate::models::RankedSymbol;
use crate::store::SnapshotSource;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::ops::Bound::{Excluded, Unbounded};

pub mod eras;

use eras::{ALIASES, DENOMINATION_PREFIX, ERAS, PREFIXED_ASSETS, STABLECOINS};

/// The fixed era list covering `date`, or `None` once listings are complete.
pub fn era_symbols(date: NaiveDate) -> Option<&'static [&'static str]> {
    ERAS.range((Excluded(date), Unbounded))
        .next()
        .map(|(_, symbols)| *symbols)
}

/// "SHIB" -> "1000SHIB"; anything else is returned unchanged.
pub fn apply_denomination(symbol: &str) -> String {
    if PREFIXED_ASSETS.contains(&symbol) {
        format!("{DENOMINATION_PREFIX}{symbol}")
    } else {
        symbol.to_string()
    }
}

/// "1000SHIB" -> "SHIB". Only strips the prefix from known redenominated
/// assets, so "1INCH" and friends pass through.
pub fn strip_denomination(ticker: &str) -> &str {
    match ticker.strip_prefix(DENOMINATION_PREFIX) {
        Some(base) if PREFIXED_ASSETS.contains(&base) => base,
        _ => ticker,
    }
}

/// Snapshot-table name for an exchange ticker that is listed under a different name.
pub fn snapshot_alias(ticker: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(exchange, _)| *exchange == ticker)
        .map(|(_, snapshot)| *snapshot)
}

/// Exchange ticker for a snapshot symbol that is listed under a different name.
pub fn exchange_alias(symbol: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(_, snapshot)| *snapshot == symbol)
        .map(|(exchange, _)| *exchange)
}

/// Full exchange ticker for a symbol stored in the funding table.
pub fn exchange_ticker(symbol: &str) -> String {
    apply_denomination(exchange_alias(symbol).unwrap_or(symbol))
}

/// Keeps the first occurrence of each ticker.
pub fn collapse_duplicates(tickers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tickers
        .into_iter()
        .filter(|ticker| seen.insert(ticker.clone()))
        .collect()
}

/// Exchange tickers worth querying at `date`, most relevant first: the era
/// list verbatim before the listing threshold, otherwise the snapshot's
/// non-stablecoin ranking with denomination and duplicates fixed up.
pub async fn candidate_tickers(
    source: &dyn SnapshotSource,
    date: NaiveDate,
) -> Result<Vec<String>, StoreError> {
    if let Some(symbols) = era_symbols(date) {
        return Ok(symbols.iter().map(|s| s.to_string()).collect());
    }

    let excluded: Vec<String> = STABLECOINS.iter().map(|s| s.to_string()).collect();
    let ranked = source.ranked_symbols(date, &excluded).await?;

    Ok(collapse_duplicates(
        ranked.iter().map(|s| apply_denomination(s)).collect(),
    ))
}

/// Resolves the candidates for `date` to ranked symbols, ascending by rank.
/// Tickers the snapshot has no positive rank for are dropped.
pub async fn resolve(
    source: &dyn SnapshotSource,
    date: NaiveDate,
) -> Result<Vec<RankedSymbol>, StoreError> {
    let mut resolved = Vec::new();

    for ticker in candidate_tickers(source, date).await? {
        let base = strip_denomination(&ticker);

        let mut found = source
            .rank_of(date, base)
            .await?
            .map(|rank| (base.to_string(), rank));

        if found.is_none() {
            if let Some(alias) = snapshot_alias(base) {
                found = source
                    .rank_of(date, alias)
                    .await?
                    .map(|rank| (alias.to_string(), rank));
            }
        }

        match found {
            Some((symbol, rank)) if rank > 0 => resolved.push(RankedSymbol {
                symbol,
                ticker: ticker.clone(),
                rank,
            }),
            Some(_) => tracing::debug!(%date, %ticker, "dropping ticker with non-positive rank"),
            None => tracing::debug!(%date, %ticker, "ticker not ranked in snapshot"),
        }
    }

    resolved.sort_by_key(|s| s.rank);
    Ok(resolved)
}

/// Finds the resolved entry an exchange pair belongs to, undoing the
/// denomination prefix and trying the alias if the plain name misses.
pub fn match_pair<'a>(resolved: &'a [RankedSymbol], pair: &str) -> Option<&'a RankedSymbol> {
    let base = strip_denomination(ticker_of(pair)?);
    let lookup = |name: &str| resolved.iter().find(|s| s.symbol == name);

    lookup(base).or_else(|| snapshot_alias(base).and_then(lookup))
}
