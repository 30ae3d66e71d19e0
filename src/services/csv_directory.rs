//! Offline price source: one `<TICKER>.csv` file per symbol.

use crate::error::ProviderError;
use crate::models::prices::{PricePoint, PriceSeries};
use crate::services::market_data::PriceProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvPriceRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Close", default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(rename = "Adj Close", default, deserialize_with = "csv::invalid_option")]
    adj_close: Option<f64>,
}

pub struct CsvDirectoryPriceProvider {
    directory: PathBuf,
}

impl CsvDirectoryPriceProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, ticker: &str) -> Result<PathBuf, ProviderError> {
        if ticker.is_empty() || ticker.contains(['/', '\\']) || ticker.starts_with('.') {
            return Err(ProviderError::Malformed(format!("unusable ticker for a file name: '{}'", ticker)));
        }
        Ok(self.directory.join(format!("{}.csv", ticker)))
    }
}

#[async_trait]
impl PriceProvider for CsvDirectoryPriceProvider {
    async fn fetch_prices(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<PriceSeries, ProviderError> {
        let path = self.path_for(ticker)?;
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProviderError::NotFound(format!("{} has no file at {}", ticker, path.display())),
            _ => ProviderError::Io(e),
        })?;

        parse_price_csv(ticker, &text, lookback_days)
    }
}

/// Parse `Date,Close[,Adj Close]` rows and keep the trailing `lookback_days`
/// calendar days, counted back from the newest row.
pub fn parse_price_csv(
    ticker: &str,
    text: &str,
    lookback_days: u32,
) -> Result<PriceSeries, ProviderError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut points = Vec::new();
    for row in reader.deserialize::<CsvPriceRow>() {
        let row = row?;
        if let Some(close) = row.adj_close.or(row.close).filter(|c| c.is_finite()) {
            points.push(PricePoint::new(row.date, close));
        }
    }

    let series = PriceSeries::new(ticker, points);
    let Some(newest) = series.last_date() else {
        return Ok(series);
    };
    let cutoff = newest - chrono::Duration::days(i64::from(lookback_days));
    let recent = series
        .points()
        .iter()
        .filter(|p| p.date > cutoff)
        .copied()
        .collect();

    Ok(PriceSeries::new(ticker, recent))
}
