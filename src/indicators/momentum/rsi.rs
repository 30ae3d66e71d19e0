//! RSI (Relative Strength Index) over simple rolling means
//!
//! RSI = 100 - (100 / (1 + RS))
//! RS  = mean gain / mean loss over the trailing `window` deltas

use crate::models::prices::PriceSeries;
use chrono::NaiveDate;
use serde::Serialize;

/// RSI for every close, NaN where undefined.
///
/// The first `window` entries are always NaN. A window with no movement at
/// all (both means zero) is NaN too; a window with gains and no losses is
/// exactly 100.
pub fn compute_rsi(closes: &[f64], window: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; closes.len()];
    if window == 0 || closes.len() <= window {
        return values;
    }

    // gains[k] / losses[k] belong to the delta ending at closes[k + 1]
    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|pair| split_change(pair[1] - pair[0]))
        .unzip();

    let period = window as f64;
    for (offset, (gain_window, loss_window)) in gains
        .windows(window)
        .zip(losses.windows(window))
        .enumerate()
    {
        let avg_gain = gain_window.iter().sum::<f64>() / period;
        let avg_loss = loss_window.iter().sum::<f64>() / period;
        values[offset + window] = rsi_from_averages(avg_gain, avg_loss);
    }

    values
}

/// Turn mean gain and mean loss into an RSI value in [0, 100], or NaN.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return f64::NAN;
    }
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { f64::NAN };
    }

    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

fn split_change(change: f64) -> (f64, f64) {
    if change.is_nan() {
        (f64::NAN, f64::NAN)
    } else {
        (change.max(0.0), (-change).max(0.0))
    }
}

/// RSI values aligned 1:1 with the dates of a price series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiSeries {
    pub ticker: String,
    pub window: usize,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl RsiSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// `(latest, previous)`, or `None` when the series has fewer than two entries.
    pub fn latest_pair(&self) -> Option<(Option<f64>, Option<f64>)> {
        match self.values.as_slice() {
            [.., previous, latest] => Some((*latest, *previous)),
            _ => None,
        }
    }
}

/// Calculate the RSI series for a ticker's closes.
pub fn calculate_rsi(series: &PriceSeries, window: usize) -> RsiSeries {
    let values = compute_rsi(&series.closes(), window)
        .into_iter()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .collect();

    RsiSeries {
        ticker: series.ticker.clone(),
        window,
        dates: series.dates(),
        values,
    }
}
