//! Environment-driven configuration.
//!
//! Binaries call `dotenvy::dotenv()` first, so every getter here also sees
//! values from a local `.env` file.

use crate::error::ScanError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_RSI_WINDOW: usize = 14;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_PRICE_API_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_UNIVERSE_URL: &str =
    "https://raw.githubusercontent.com/datasets/s-and-p-500-companies/main/data/constituents.csv";
pub const DEFAULT_UNIVERSE_COLUMN: &str = "Symbol";
pub const DEFAULT_CHART_TITLE: &str = "S&P 500 RSI Heatmap";

pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_price_api_url() -> String {
    env::var("PRICE_API_URL").unwrap_or_else(|_| DEFAULT_PRICE_API_URL.to_string())
}

pub fn get_output_dir() -> PathBuf {
    env::var("OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("output"))
}

pub fn get_chart_title() -> String {
    env::var("CHART_TITLE").unwrap_or_else(|_| DEFAULT_CHART_TITLE.to_string())
}

pub fn get_port() -> Result<u16, ScanError> {
    Ok(parse_env("PORT")?.unwrap_or(8080))
}

/// Parameters shared by the RSI engine and the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub window: usize,
    pub lookback_days: u32,
    pub concurrency: usize,
    pub symbol_timeout: Option<Duration>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_RSI_WINDOW,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            concurrency: DEFAULT_CONCURRENCY,
            symbol_timeout: None,
        }
    }
}

impl ScanConfig {
    pub fn from_env() -> Result<Self, ScanError> {
        let defaults = Self::default();
        let timeout_secs: Option<u64> = parse_env("SYMBOL_TIMEOUT_SECONDS")?;

        let config = Self {
            window: parse_env("RSI_WINDOW")?.unwrap_or(defaults.window),
            lookback_days: parse_env("LOOKBACK_DAYS")?.unwrap_or(defaults.lookback_days),
            concurrency: parse_env("SCAN_CONCURRENCY")?.unwrap_or(defaults.concurrency),
            symbol_timeout: timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_symbol_timeout(mut self, timeout: Duration) -> Self {
        self.symbol_timeout = Some(timeout);
        self
    }

    /// Minimum closes a symbol needs for both the latest and prior RSI.
    pub fn required_closes(&self) -> usize {
        self.window.saturating_add(2)
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.window == 0 {
            return Err(ScanError::Config("RSI window must be positive".to_string()));
        }
        if self.concurrency == 0 {
            return Err(ScanError::Config("scan concurrency must be positive".to_string()));
        }
        if self.lookback_days == 0 {
            return Err(ScanError::Config("lookback days must be positive".to_string()));
        }
        Ok(())
    }
}

/// Where the symbol universe comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum UniverseSource {
    Symbols(Vec<String>),
    Url { url: String, column: String },
}

impl UniverseSource {
    /// `SYMBOLS` wins over `UNIVERSE_URL`.
    pub fn from_env() -> Self {
        if let Some(symbols) = env::var("SYMBOLS").ok().map(|s| parse_symbols(&s)) {
            if !symbols.is_empty() {
                return UniverseSource::Symbols(symbols);
            }
        }
        UniverseSource::Url {
            url: env::var("UNIVERSE_URL").unwrap_or_else(|_| DEFAULT_UNIVERSE_URL.to_string()),
            column: env::var("UNIVERSE_COLUMN")
                .unwrap_or_else(|_| DEFAULT_UNIVERSE_COLUMN.to_string()),
        }
    }
}

/// Where daily closes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceSource {
    Yahoo { base_url: String },
    CsvDirectory(PathBuf),
}

impl PriceSource {
    pub fn from_env() -> Result<Self, ScanError> {
        let raw = env::var("PRICE_SOURCE").unwrap_or_else(|_| "yahoo".to_string());
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("yahoo") {
            return Ok(PriceSource::Yahoo {
                base_url: get_price_api_url(),
            });
        }
        match raw.strip_prefix("csv:") {
            Some(dir) if !dir.trim().is_empty() => Ok(PriceSource::CsvDirectory(PathBuf::from(dir.trim()))),
            _ => Err(ScanError::Config(format!(
                "PRICE_SOURCE must be 'yahoo' or 'csv:<directory>', got '{}'",
                raw
            ))),
        }
    }
}

/// Split a comma-separated ticker list, keeping order and duplicates.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ScanError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ScanError::Config(format!("{} has an invalid value: '{}'", key, raw))),
        _ => Ok(None),
    }
}
