//! Unit tests for configuration

use rsi_heatmap::config::{parse_symbols, PriceSource, ScanConfig, DEFAULT_RSI_WINDOW};
use rsi_heatmap::error::ScanError;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_scan_config_default() {
    let config = ScanConfig::default();
    assert_eq!(config.window, DEFAULT_RSI_WINDOW);
    assert_eq!(config.window, 14);
    assert_eq!(config.lookback_days, 90);
    assert!(config.symbol_timeout.is_none());
    assert_eq!(config.required_closes(), 16);
    assert!(config.validate().is_ok());
}

#[test]
fn test_scan_config_builders() {
    let config = ScanConfig::default()
        .with_window(5)
        .with_concurrency(2)
        .with_symbol_timeout(Duration::from_secs(3));
    assert_eq!(config.window, 5);
    assert_eq!(config.concurrency, 2);
    assert_eq!(config.symbol_timeout, Some(Duration::from_secs(3)));
}

#[test]
fn test_scan_config_rejects_zero_values() {
    assert!(matches!(
        ScanConfig::default().with_window(0).validate(),
        Err(ScanError::Config(_))
    ));
    assert!(matches!(
        ScanConfig::default().with_concurrency(0).validate(),
        Err(ScanError::Config(_))
    ));
}

#[test]
fn test_parse_symbols_keeps_order_and_duplicates() {
    assert_eq!(
        parse_symbols(" AAPL, MSFT,,BRK.B ,AAPL"),
        vec!["AAPL", "MSFT", "BRK.B", "AAPL"]
    );
    assert!(parse_symbols(" , ").is_empty());
}

#[test]
fn test_price_source_parsing() {
    assert_eq!(
        PriceSource::parse("csv:/data/closes").unwrap(),
        PriceSource::CsvDirectory(PathBuf::from("/data/closes"))
    );
    assert!(matches!(PriceSource::parse("Yahoo"), Ok(PriceSource::Yahoo { .. })));
    assert!(matches!(PriceSource::parse("csv:"), Err(ScanError::Config(_))));
    assert!(matches!(PriceSource::parse("bloomberg"), Err(ScanError::Config(_))));
}

#[test]
fn test_required_closes_saturates() {
    assert_eq!(ScanConfig::default().with_window(usize::MAX).required_closes(), usize::MAX);
}
