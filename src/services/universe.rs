//! Index constituents from a CSV listing served over HTTP.

use crate::error::ProviderError;
use crate::services::market_data::UniverseProvider;
use async_trait::async_trait;
use tracing::{debug, info};

pub struct CsvUniverseProvider {
    url: String,
    column: String,
    client: reqwest::Client,
}

impl CsvUniverseProvider {
    pub fn new(url: impl Into<String>, column: impl Into<String>) -> Self {
        Self::with_client(url, column, reqwest::Client::new())
    }

    pub fn with_client(
        url: impl Into<String>,
        column: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            url: url.into(),
            column: column.into(),
            client,
        }
    }
}

#[async_trait]
impl UniverseProvider for CsvUniverseProvider {
    async fn fetch_universe(&self) -> Result<Vec<String>, ProviderError> {
        debug!(url = %self.url, "Downloading universe listing");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let tickers = parse_universe_csv(&body, &self.column)?;
        info!(
            count = tickers.len(),
            column = %self.column,
            "Loaded {} tickers from universe listing",
            tickers.len()
        );
        Ok(tickers)
    }
}

/// Read the `column` cells of a CSV document in row order, skipping blanks.
pub fn parse_universe_csv(text: &str, column: &str) -> Result<Vec<String>, ProviderError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let index = reader
        .headers()?
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| ProviderError::Malformed(format!("universe listing has no '{}' column", column)))?;

    let mut tickers = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(ticker) = record.get(index).map(str::trim).filter(|t| !t.is_empty()) {
            tickers.push(ticker.to_string());
        }
    }
    Ok(tickers)
}
