//! Cross-sectional aggregation over the whole universe.

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::models::comparison::{AggregateStats, ComparisonTable, ScanReport, SymbolDiagnostic, SymbolResult};
use crate::scan::symbol::evaluate_symbol;
use crate::services::market_data::PriceProvider;
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Result of fetching and evaluating one universe entry.
#[derive(Debug)]
pub struct SymbolOutcome {
    pub index: usize,
    pub ticker: String,
    pub result: Result<SymbolResult, ScanError>,
}

/// Fetch, evaluate and collect every ticker in `universe`.
///
/// Per-symbol failures become diagnostics and never abort the batch. Up to
/// `config.concurrency` symbols are in flight at once; the table is still in
/// universe order.
pub async fn build_comparison_table<P>(
    universe: &[String],
    provider: &P,
    config: &ScanConfig,
) -> Result<ScanReport, ScanError>
where
    P: PriceProvider + ?Sized,
{
    config.validate()?;
    if universe.is_empty() {
        return Err(ScanError::EmptyUniverse);
    }

    // items must be owned: a borrowed ticker makes the future non-Send under tokio::spawn
    let mut outcomes: Vec<SymbolOutcome> = stream::iter(universe.iter().cloned().enumerate())
        .map(move |(index, ticker)| async move {
            let result = scan_symbol(&ticker, provider, config).await;
            SymbolOutcome {
                index,
                ticker,
                result,
            }
        })
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    // completion order must not leak into the table
    outcomes.sort_by_key(|outcome| outcome.index);

    let accumulator = outcomes
        .into_iter()
        .fold(ScanAccumulator::default(), ScanAccumulator::absorb);
    accumulator.finish(config.window)
}

/// Fetch one ticker (bounded by the optional timeout) and evaluate it.
pub async fn scan_symbol<P>(
    ticker: &str,
    provider: &P,
    config: &ScanConfig,
) -> Result<SymbolResult, ScanError>
where
    P: PriceProvider + ?Sized,
{
    let fetch = provider.fetch_prices(ticker, config.lookback_days);
    let fetched = match config.symbol_timeout {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .map_err(|_| ScanError::Timeout {
                ticker: ticker.to_string(),
                after: limit,
            })?,
        None => fetch.await,
    };

    let series = fetched.map_err(|e| ScanError::Fetch {
        ticker: ticker.to_string(),
        reason: e.to_string(),
        transient: e.is_transient(),
    })?;

    debug!(
        symbol = %ticker,
        closes = series.len(),
        "Fetched {} closes for {}",
        series.len(),
        ticker
    );

    evaluate_symbol(ticker, &series, config.window)
}

/// Folds symbol outcomes, in universe order, into a report.
#[derive(Debug, Default)]
pub struct ScanAccumulator {
    table: ComparisonTable,
    diagnostics: Vec<SymbolDiagnostic>,
    unavailable: usize,
}

impl ScanAccumulator {
    pub fn absorb(mut self, outcome: SymbolOutcome) -> Self {
        match outcome.result {
            Ok(row) => self.table.push(row),
            Err(error) => {
                warn!(
                    symbol = %outcome.ticker,
                    kind = error.kind(),
                    error = %error,
                    "Skipping {}: {}",
                    outcome.ticker,
                    error
                );
                if error.is_provider_unavailable() {
                    self.unavailable += 1;
                }
                self.diagnostics.push(SymbolDiagnostic {
                    ticker: outcome.ticker,
                    kind: error.kind().to_string(),
                    message: error.to_string(),
                });
            }
        }
        self
    }

    /// Compute the aggregate once every symbol has been absorbed.
    ///
    /// Fails only when nothing succeeded and every symbol hit an unreachable
    /// provider (transport error, 5xx, 429 or timeout). Symbols the provider
    /// reports as missing are ordinary skips.
    pub fn finish(self, window: usize) -> Result<ScanReport, ScanError> {
        let attempted = self.table.len() + self.diagnostics.len();
        if self.table.is_empty() && attempted > 0 && self.unavailable == attempted {
            return Err(ScanError::ProviderOutage { attempted });
        }

        let stats = AggregateStats::from_table(&self.table);
        info!(
            attempted,
            included = self.table.len(),
            skipped = self.diagnostics.len(),
            average_rsi = ?stats.average_rsi,
            "Scan complete: {} of {} symbols included",
            self.table.len(),
            attempted
        );

        Ok(ScanReport {
            table: self.table,
            stats,
            diagnostics: self.diagnostics,
            window,
            generated_at: Utc::now(),
        })
    }
}
