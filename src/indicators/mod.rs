pub mod momentum;

pub use momentum::{calculate_rsi, compute_rsi, RsiSeries};
