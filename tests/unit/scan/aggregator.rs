//! Unit tests for the cross-sectional aggregator

use crate::fixtures::{assert_close, falling_closes, rising_closes, series, x_closes, y_closes};
use rsi_heatmap::config::ScanConfig;
use rsi_heatmap::error::ScanError;
use rsi_heatmap::scan::build_comparison_table;
use rsi_heatmap::services::market_data::InMemoryPriceProvider;
use std::time::Duration;

fn universe(tickers: &[&str]) -> Vec<String> {
    tickers.iter().map(|t| t.to_string()).collect()
}

#[tokio::test]
async fn short_history_symbol_is_excluded_with_diagnostic() {
    let provider = InMemoryPriceProvider::new()
        .with_series(series("A", &rising_closes(30)))
        .with_series(series("B", &rising_closes(5)))
        .with_series(series("C", &falling_closes(30)));

    let report = build_comparison_table(&universe(&["A", "B", "C"]), &provider, &ScanConfig::default())
        .await
        .expect("scan succeeds");

    assert_eq!(report.table.tickers(), vec!["A", "C"]);
    let diagnostic = report.diagnostic_for("B").expect("diagnostic for B");
    assert_eq!(diagnostic.kind, "insufficient_history");
    assert!(diagnostic.message.contains('B'));
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.window, 14);
}

#[tokio::test]
async fn rows_and_average_match_expected_scenario() {
    let provider = InMemoryPriceProvider::new()
        .with_series(series("X", &x_closes()))
        .with_series(series("Y", &y_closes()));
    let config = ScanConfig::default().with_window(5);

    let report = build_comparison_table(&universe(&["X", "Y"]), &provider, &config)
        .await
        .unwrap();

    let rows = report.table.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].ticker, "X");
    assert_close(rows[0].rsi.unwrap(), 65.0);
    assert_close(rows[0].prev_rsi.unwrap(), 40.0);
    assert_eq!(rows[1].ticker, "Y");
    assert_close(rows[1].rsi.unwrap(), 55.0);
    assert_close(rows[1].prev_rsi.unwrap(), 80.0);
    assert_close(report.stats.average_rsi.unwrap(), 60.0);
    assert_eq!(report.stats.rising, 1);
}

#[tokio::test]
async fn fetch_failure_is_skipped_and_batch_continues() {
    let provider = InMemoryPriceProvider::new()
        .with_series(series("A", &rising_closes(30)))
        .with_failure("B", "provider unavailable")
        .with_series(series("C", &rising_closes(30)));

    let report = build_comparison_table(&universe(&["A", "B", "C", "MISSING"]), &provider, &ScanConfig::default())
        .await
        .unwrap();

    assert_eq!(report.table.tickers(), vec!["A", "C"]);
    assert!(report.table.get("B").is_none());
    assert_eq!(report.diagnostic_for("B").unwrap().kind, "fetch");
    assert!(report.diagnostic_for("B").unwrap().message.contains("provider unavailable"));
    assert_eq!(report.diagnostic_for("MISSING").unwrap().kind, "fetch");
    assert_eq!(report.attempted(), 4);
}

#[tokio::test]
async fn completion_order_does_not_leak_into_table() {
    let tickers = ["T1", "T2", "T3", "T4", "T5", "T6"];
    let mut provider = InMemoryPriceProvider::new();
    for (i, ticker) in tickers.iter().enumerate() {
        // earlier tickers finish last
        let delay = Duration::from_millis(10 * (tickers.len() - i) as u64);
        provider = provider
            .with_series(series(ticker, &rising_closes(20 + i)))
            .with_delay(ticker, delay);
    }
    let config = ScanConfig::default().with_concurrency(tickers.len());

    let report = build_comparison_table(&universe(&tickers), &provider, &config)
        .await
        .unwrap();

    assert_eq!(report.table.tickers(), tickers.to_vec());
}

#[tokio::test]
async fn sequential_and_parallel_scans_agree() {
    let provider = InMemoryPriceProvider::new()
        .with_series(series("A", &x_closes()))
        .with_series(series("B", &y_closes()))
        .with_series(series("C", &rising_closes(10)));
    let tickers = universe(&["C", "A", "B"]);

    let sequential = build_comparison_table(&tickers, &provider, &ScanConfig::default().with_window(5).with_concurrency(1))
        .await
        .unwrap();
    let parallel = build_comparison_table(&tickers, &provider, &ScanConfig::default().with_window(5).with_concurrency(3))
        .await
        .unwrap();

    assert_eq!(sequential.table, parallel.table);
    assert_eq!(sequential.stats, parallel.stats);
}

#[tokio::test]
async fn empty_universe_is_fatal() {
    let provider = InMemoryPriceProvider::new();
    let err = build_comparison_table(&[], &provider, &ScanConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::EmptyUniverse));
}

#[tokio::test]
async fn total_fetch_outage_is_fatal() {
    let provider = InMemoryPriceProvider::new()
        .with_failure("A", "down")
        .with_failure("B", "down");
    let err = build_comparison_table(&universe(&["A", "B"]), &provider, &ScanConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::ProviderOutage { attempted: 2 }));
}

#[tokio::test]
async fn all_short_histories_give_empty_table_not_error() {
    let provider = InMemoryPriceProvider::new()
        .with_series(series("A", &rising_closes(3)))
        .with_series(series("B", &rising_closes(4)));
    let report = build_comparison_table(&universe(&["A", "B"]), &provider, &ScanConfig::default())
        .await
        .unwrap();
    assert!(report.table.is_empty());
    assert!(report.stats.average_rsi.is_none());
    assert_eq!(report.diagnostics.len(), 2);
}

#[tokio::test]
async fn duplicate_tickers_are_processed_independently() {
    let provider = InMemoryPriceProvider::new().with_series(series("A", &rising_closes(20)));
    let report = build_comparison_table(&universe(&["A", "A"]), &provider, &ScanConfig::default())
        .await
        .unwrap();
    assert_eq!(report.table.tickers(), vec!["A", "A"]);
}

#[tokio::test]
async fn slow_symbol_times_out_as_a_per_symbol_failure() {
    let provider = InMemoryPriceProvider::new()
        .with_series(series("FAST", &rising_closes(20)))
        .with_series(series("SLOW", &rising_closes(20)))
        .with_delay("SLOW", Duration::from_millis(500));
    let config = ScanConfig::default().with_symbol_timeout(Duration::from_millis(20));

    let report = build_comparison_table(&universe(&["SLOW", "FAST"]), &provider, &config)
        .await
        .unwrap();

    assert_eq!(report.table.tickers(), vec!["FAST"]);
    assert_eq!(report.diagnostic_for("SLOW").unwrap().kind, "timeout");
}

#[tokio::test]
async fn flat_symbol_is_kept_but_left_out_of_average() {
    let provider = InMemoryPriceProvider::new()
        .with_series(series("FLAT", &[50.0; 20]))
        .with_series(series("UP", &rising_closes(20)));
    let report = build_comparison_table(&universe(&["FLAT", "UP"]), &provider, &ScanConfig::default())
        .await
        .unwrap();

    assert_eq!(report.table.tickers(), vec!["FLAT", "UP"]);
    assert!(report.table.get("FLAT").unwrap().rsi.is_none());
    assert_close(report.stats.average_rsi.unwrap(), 100.0);
    assert_eq!(report.stats.defined, 1);
}

#[tokio::test]
async fn invalid_window_is_rejected() {
    let provider = InMemoryPriceProvider::new();
    let err = build_comparison_table(&universe(&["A"]), &provider, &ScanConfig::default().with_window(0))
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::Config(_)));
}

#[tokio::test]
async fn missing_symbol_is_a_skip_not_an_outage() {
    let provider = InMemoryPriceProvider::new();
    let report = build_comparison_table(&universe(&["DELISTED"]), &provider, &ScanConfig::default())
        .await
        .expect("missing data never aborts the scan");

    assert!(report.table.is_empty());
    assert_eq!(report.diagnostic_for("DELISTED").unwrap().kind, "fetch");
    assert!(report.stats.average_rsi.is_none());
}

#[tokio::test]
async fn all_missing_symbols_give_empty_report() {
    let provider = InMemoryPriceProvider::new();
    let report = build_comparison_table(&universe(&["GONE1", "GONE2"]), &provider, &ScanConfig::default())
        .await
        .unwrap();

    assert!(report.table.is_empty());
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.attempted(), 2);
}

#[tokio::test]
async fn missing_and_unreachable_mix_is_not_an_outage() {
    let provider = InMemoryPriceProvider::new().with_failure("DOWN", "service unavailable");
    let report = build_comparison_table(&universe(&["DOWN", "GONE"]), &provider, &ScanConfig::default())
        .await
        .unwrap();

    assert_eq!(report.diagnostics.len(), 2);
}

#[tokio::test]
async fn all_timeouts_count_as_outage() {
    let provider = InMemoryPriceProvider::new()
        .with_series(series("A", &rising_closes(20)))
        .with_delay("A", Duration::from_millis(500));
    let config = ScanConfig::default().with_symbol_timeout(Duration::from_millis(20));

    let err = build_comparison_table(&universe(&["A"]), &provider, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::ProviderOutage { attempted: 1 }));
}

#[tokio::test]
async fn huge_window_skips_symbols_without_overflow() {
    let provider = InMemoryPriceProvider::new().with_series(series("A", &rising_closes(20)));
    let config = ScanConfig::default().with_window(usize::MAX);

    let report = build_comparison_table(&universe(&["A"]), &provider, &config)
        .await
        .unwrap();
    assert_eq!(report.diagnostic_for("A").unwrap().kind, "insufficient_history");
}
