//! Universe-wide RSI scan.

pub mod aggregator;
pub mod symbol;

pub use aggregator::{build_comparison_table, scan_symbol, ScanAccumulator, SymbolOutcome};
pub use symbol::evaluate_symbol;
