//! Error types for providers, the scan pipeline and rendering.

use std::time::Duration;
use thiserror::Error;

/// Failure reported by a universe or price provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed data: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ProviderError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors raised while scanning the universe.
///
/// `Fetch`, `InsufficientHistory` and `Timeout` are per-symbol and never
/// escape the aggregator; the remaining variants end the run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// `transient` is set when the provider looked unreachable rather than
    /// answering that the symbol has no data.
    #[error("failed to fetch prices for {ticker}: {reason}")]
    Fetch {
        ticker: String,
        reason: String,
        transient: bool,
    },

    #[error("insufficient history for {ticker}: {available} closes, need {required}")]
    InsufficientHistory {
        ticker: String,
        available: usize,
        required: usize,
    },

    #[error("timed out fetching {ticker} after {after:?}")]
    Timeout { ticker: String, after: Duration },

    #[error("universe provider returned no tickers")]
    EmptyUniverse,

    #[error("universe provider failed: {0}")]
    Universe(String),

    #[error("price provider outage: all {attempted} symbols failed with the provider unreachable")]
    ProviderOutage { attempted: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    /// Stable label used in diagnostics and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::Fetch { .. } => "fetch",
            ScanError::InsufficientHistory { .. } => "insufficient_history",
            ScanError::Timeout { .. } => "timeout",
            ScanError::EmptyUniverse => "empty_universe",
            ScanError::Universe(_) => "universe",
            ScanError::ProviderOutage { .. } => "provider_outage",
            ScanError::Config(_) => "config",
        }
    }

    /// Whether this failure says the price source itself is down.
    ///
    /// Missing or malformed data for a symbol does not count.
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            ScanError::Fetch { transient: true, .. } | ScanError::Timeout { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
