//! Data shared between the engine, the aggregator and the renderers.

pub mod comparison;
pub mod prices;

pub use comparison::{
    AggregateStats, ComparisonTable, RsiZone, ScanReport, SymbolDiagnostic, SymbolResult,
    OVERBOUGHT_THRESHOLD, OVERSOLD_THRESHOLD,
};
pub use prices::{PricePoint, PriceSeries};
