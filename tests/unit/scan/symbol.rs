//! Unit tests for per-symbol evaluation

use crate::fixtures::{assert_close, rising_closes, series, x_closes};
use rsi_heatmap::error::ScanError;
use rsi_heatmap::scan::evaluate_symbol;

#[test]
fn test_requires_window_plus_two_closes() {
    let err = evaluate_symbol("B", &series("B", &rising_closes(15)), 14).unwrap_err();
    match err {
        ScanError::InsufficientHistory {
            ticker,
            available,
            required,
        } => {
            assert_eq!(ticker, "B");
            assert_eq!(available, 15);
            assert_eq!(required, 16);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(evaluate_symbol("B", &series("B", &rising_closes(16)), 14).is_ok());
}

#[test]
fn test_extracts_latest_and_previous() {
    let row = evaluate_symbol("X", &series("X", &x_closes()), 5).unwrap();
    assert_eq!(row.ticker, "X");
    assert_close(row.rsi.unwrap(), 65.0);
    assert_close(row.prev_rsi.unwrap(), 40.0);
}

#[test]
fn test_flat_history_is_kept_with_undefined_values() {
    let row = evaluate_symbol("FLAT", &series("FLAT", &[10.0; 20]), 14).unwrap();
    assert!(row.rsi.is_none());
    assert!(row.prev_rsi.is_none());
}

#[test]
fn test_huge_window_reports_saturated_requirement() {
    let err = evaluate_symbol("A", &series("A", &rising_closes(20)), usize::MAX).unwrap_err();
    match err {
        ScanError::InsufficientHistory { required, .. } => assert_eq!(required, usize::MAX),
        other => panic!("unexpected error: {:?}", other),
    }
}
