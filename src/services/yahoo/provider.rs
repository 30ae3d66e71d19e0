//! Daily closes from a Yahoo-compatible chart API.

use super::messages::ChartEnvelope;
use crate::error::ProviderError;
use crate::models::prices::PriceSeries;
use crate::services::market_data::PriceProvider;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) rsi-heatmap/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_EXCERPT_LEN: usize = 200;

pub struct YahooPriceProvider {
    base_url: Url,
    client: reqwest::Client,
    max_retries: usize,
    min_backoff: Duration,
}

impl YahooPriceProvider {
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ProviderError::Malformed(format!("invalid price API URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            base_url,
            client,
            max_retries: 3,
            min_backoff: Duration::from_millis(500),
        })
    }

    pub fn with_retry(mut self, max_retries: usize, min_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.min_backoff = min_backoff;
        self
    }

    /// Chart URL for `ticker` covering `lookback_days` calendar days before `now`.
    pub fn chart_url(
        &self,
        ticker: &str,
        lookback_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Url, ProviderError> {
        let symbol = yahoo_symbol(ticker);
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Malformed(format!("cannot extend URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol.as_str()]);

        let period1 = (now - chrono::Duration::days(i64::from(lookback_days))).timestamp();
        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &now.timestamp().to_string())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true");

        Ok(url)
    }

    async fn fetch_once(&self, ticker: &str, lookback_days: u32) -> Result<PriceSeries, ProviderError> {
        let url = self.chart_url(ticker, lookback_days, Utc::now())?;
        debug!(symbol = %ticker, url = %url, "Requesting daily closes for {}", ticker);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            // the error envelope names the reason when it parses
            return match serde_json::from_str::<ChartEnvelope>(&body) {
                Ok(envelope) => envelope.into_series(ticker),
                Err(_) => Err(ProviderError::NotFound(format!("no chart for {}", ticker))),
            };
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT_LEN).collect(),
            });
        }

        let envelope: ChartEnvelope = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Malformed(format!("{}: {}", ticker, e)))?;
        envelope.into_series(ticker)
    }
}

#[async_trait]
impl PriceProvider for YahooPriceProvider {
    async fn fetch_prices(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<PriceSeries, ProviderError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_backoff)
            .with_max_times(self.max_retries);

        (|| async { self.fetch_once(ticker, lookback_days).await })
            .retry(backoff)
            .when(|e: &ProviderError| e.is_transient())
            .notify(|e: &ProviderError, after: Duration| {
                debug!(
                    symbol = %ticker,
                    error = %e,
                    "Transient failure for {}, retrying in {:?}",
                    ticker,
                    after
                );
            })
            .await
    }
}

/// Class shares are listed with a dot (`BRK.B`) but quoted with a dash.
pub fn yahoo_symbol(ticker: &str) -> String {
    ticker.trim().replace('.', "-")
}
