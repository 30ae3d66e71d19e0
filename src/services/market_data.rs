//! Provider interfaces for the symbol universe and daily closes.

use crate::error::ProviderError;
use crate::models::prices::PriceSeries;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

#[async_trait]
pub trait UniverseProvider: Send + Sync {
    /// Ordered tickers under analysis. Duplicates are passed through.
    async fn fetch_universe(&self) -> Result<Vec<String>, ProviderError>;
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily closes for `ticker` covering the last `lookback_days` calendar days.
    async fn fetch_prices(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<PriceSeries, ProviderError>;
}

/// Fixed ticker list, typically from the `SYMBOLS` variable.
#[derive(Debug, Clone, Default)]
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl UniverseProvider for StaticUniverse {
    async fn fetch_universe(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.symbols.clone())
    }
}

#[derive(Debug, Clone)]
enum StoredPrices {
    Series(PriceSeries),
    Failure(String),
}

/// Map-backed provider. Unknown tickers are `NotFound`; failures and
/// per-ticker delays can be injected.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceProvider {
    prices: HashMap<String, StoredPrices>,
    delays: HashMap<String, Duration>,
}

impl InMemoryPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.prices
            .insert(series.ticker.clone(), StoredPrices::Series(series));
        self
    }

    pub fn with_failure(mut self, ticker: &str, reason: &str) -> Self {
        self.prices
            .insert(ticker.to_string(), StoredPrices::Failure(reason.to_string()));
        self
    }

    pub fn with_delay(mut self, ticker: &str, delay: Duration) -> Self {
        self.delays.insert(ticker.to_string(), delay);
        self
    }
}

#[async_trait]
impl PriceProvider for InMemoryPriceProvider {
    async fn fetch_prices(
        &self,
        ticker: &str,
        _lookback_days: u32,
    ) -> Result<PriceSeries, ProviderError> {
        if let Some(delay) = self.delays.get(ticker) {
            tokio::time::sleep(*delay).await;
        }

        match self.prices.get(ticker) {
            Some(StoredPrices::Series(series)) => Ok(series.clone()),
            Some(StoredPrices::Failure(reason)) => Err(ProviderError::Status {
                status: 503,
                body: reason.clone(),
            }),
            None => Err(ProviderError::NotFound(format!("no prices for {}", ticker))),
        }
    }
}
