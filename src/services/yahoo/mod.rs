pub mod messages;
pub mod provider;

pub use provider::{yahoo_symbol, YahooPriceProvider};
