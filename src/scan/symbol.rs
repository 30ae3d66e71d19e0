//! Per-symbol evaluation: no I/O, no logging.

use crate::error::ScanError;
use crate::indicators::momentum::rsi::calculate_rsi;
use crate::models::comparison::SymbolResult;
use crate::models::prices::PriceSeries;

/// Latest and prior RSI for one ticker.
///
/// Needs `window + 2` closes; a flat window yields an undefined value rather
/// than an error.
pub fn evaluate_symbol(
    ticker: &str,
    series: &PriceSeries,
    window: usize,
) -> Result<SymbolResult, ScanError> {
    let required = window.saturating_add(2);
    if series.len() < required {
        return Err(ScanError::InsufficientHistory {
            ticker: ticker.to_string(),
            available: series.len(),
            required,
        });
    }

    let rsi = calculate_rsi(series, window);
    let (latest, previous) = rsi.latest_pair().ok_or_else(|| ScanError::InsufficientHistory {
        ticker: ticker.to_string(),
        available: series.len(),
        required,
    })?;

    Ok(SymbolResult::new(ticker, latest, previous))
}
