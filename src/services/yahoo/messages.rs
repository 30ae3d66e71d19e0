//! Response payloads of the Yahoo-style `/v8/finance/chart` endpoint.

use crate::error::ProviderError;
use crate::models::prices::{PricePoint, PriceSeries};
use chrono::DateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Option<Vec<Option<f64>>>,
}

impl ChartIndicators {
    /// Adjusted closes when the payload carries them, raw closes otherwise.
    fn preferred_closes(self) -> Vec<Option<f64>> {
        let adjusted = self
            .adjclose
            .into_iter()
            .next()
            .and_then(|a| a.adjclose)
            .filter(|closes| !closes.is_empty());

        adjusted
            .or_else(|| self.quote.into_iter().next().and_then(|q| q.close))
            .unwrap_or_default()
    }
}

impl ChartEnvelope {
    pub fn into_series(self, ticker: &str) -> Result<PriceSeries, ProviderError> {
        if let Some(error) = self.chart.error {
            return Err(if error.code.eq_ignore_ascii_case("Not Found") {
                ProviderError::NotFound(format!("{}: {}", ticker, error.description))
            } else {
                ProviderError::Malformed(format!("{}: {}", error.code, error.description))
            });
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ProviderError::NotFound(format!("no chart data for {}", ticker)))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let closes = result.indicators.preferred_closes();
        if closes.len() != timestamps.len() {
            return Err(ProviderError::Malformed(format!(
                "{}: {} timestamps but {} closes",
                ticker,
                timestamps.len(),
                closes.len()
            )));
        }

        // null closes mark sessions without a print
        let points = timestamps
            .into_iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let close = close.filter(|c| c.is_finite())?;
                let date = DateTime::from_timestamp(ts, 0)?.date_naive();
                Some(PricePoint::new(date, close))
            })
            .collect();

        Ok(PriceSeries::new(ticker, points))
    }
}
