//! Cross-sectional RSI scanner: computes the Relative Strength Index for every
//! constituent of an index and renders a single comparison chart.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod render;
pub mod scan;
pub mod services;

pub use config::ScanConfig;
pub use error::{ProviderError, RenderError, ScanError};
pub use models::{AggregateStats, ComparisonTable, PriceSeries, ScanReport, SymbolResult};
pub use scan::build_comparison_table;
