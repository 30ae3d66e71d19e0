//! The display-ready comparison dataset handed to renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;
pub const OVERSOLD_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi > OVERBOUGHT_THRESHOLD {
            RsiZone::Overbought
        } else if rsi < OVERSOLD_THRESHOLD {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RsiZone::Oversold => "Oversold",
            RsiZone::Neutral => "Neutral",
            RsiZone::Overbought => "Overbought",
        };
        f.write_str(label)
    }
}

/// Latest and prior-day RSI for one ticker. `None` marks an undefined value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolResult {
    pub ticker: String,
    pub rsi: Option<f64>,
    pub prev_rsi: Option<f64>,
}

impl SymbolResult {
    pub fn new(ticker: impl Into<String>, rsi: Option<f64>, prev_rsi: Option<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            rsi,
            prev_rsi,
        }
    }

    /// Day-over-day RSI change, when both values are defined.
    pub fn change(&self) -> Option<f64> {
        match (self.rsi, self.prev_rsi) {
            (Some(rsi), Some(prev)) => Some(rsi - prev),
            _ => None,
        }
    }

    pub fn is_rising(&self) -> bool {
        self.change().is_some_and(|c| c > 0.0)
    }

    pub fn zone(&self) -> Option<RsiZone> {
        self.rsi.map(RsiZone::classify)
    }
}

/// Successful symbols in universe order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    rows: Vec<SymbolResult>,
}

impl ComparisonTable {
    pub fn new(rows: Vec<SymbolResult>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: SymbolResult) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[SymbolResult] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolResult> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.ticker.as_str()).collect()
    }

    pub fn get(&self, ticker: &str) -> Option<&SymbolResult> {
        self.rows.iter().find(|r| r.ticker == ticker)
    }

    /// Remove the first row for `ticker`.
    pub fn remove(&mut self, ticker: &str) -> Option<SymbolResult> {
        let index = self.rows.iter().position(|r| r.ticker == ticker)?;
        Some(self.rows.remove(index))
    }

    /// Arithmetic mean of the defined RSI values.
    pub fn average_rsi(&self) -> Option<f64> {
        let (sum, count) = self
            .rows
            .iter()
            .filter_map(|r| r.rsi)
            .fold((0.0, 0usize), |(sum, count), rsi| (sum + rsi, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

impl IntoIterator for ComparisonTable {
    type Item = SymbolResult;
    type IntoIter = std::vec::IntoIter<SymbolResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub average_rsi: Option<f64>,
    pub defined: usize,
    pub overbought: usize,
    pub oversold: usize,
    pub rising: usize,
}

impl AggregateStats {
    pub fn from_table(table: &ComparisonTable) -> Self {
        let mut stats = Self {
            average_rsi: table.average_rsi(),
            ..Self::default()
        };
        for row in table.iter() {
            match row.zone() {
                Some(RsiZone::Overbought) => stats.overbought += 1,
                Some(RsiZone::Oversold) => stats.oversold += 1,
                Some(RsiZone::Neutral) => {}
                None => continue,
            }
            stats.defined += 1;
            if row.is_rising() {
                stats.rising += 1;
            }
        }
        stats
    }
}

/// Why a ticker was left out of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDiagnostic {
    pub ticker: String,
    pub kind: String,
    pub message: String,
}

/// Outcome of a full scan: the table, its statistics and the skipped symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub table: ComparisonTable,
    pub stats: AggregateStats,
    pub diagnostics: Vec<SymbolDiagnostic>,
    pub window: usize,
    pub generated_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn attempted(&self) -> usize {
        self.table.len() + self.diagnostics.len()
    }

    pub fn diagnostic_for(&self, ticker: &str) -> Option<&SymbolDiagnostic> {
        self.diagnostics.iter().find(|d| d.ticker == ticker)
    }
}
