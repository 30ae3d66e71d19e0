//! End-to-end scan: universe, prices, aggregation and metrics.

use crate::config::{PriceSource, ScanConfig, UniverseSource};
use crate::error::ScanError;
use crate::metrics::Metrics;
use crate::models::comparison::ScanReport;
use crate::scan::build_comparison_table;
use crate::services::{
    CsvDirectoryPriceProvider, CsvUniverseProvider, PriceProvider, StaticUniverse,
    UniverseProvider, YahooPriceProvider,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

pub struct ScanRuntime {
    universe: Arc<dyn UniverseProvider>,
    prices: Arc<dyn PriceProvider>,
    config: ScanConfig,
    metrics: Option<Arc<Metrics>>,
}

impl ScanRuntime {
    pub fn new(
        universe: Arc<dyn UniverseProvider>,
        prices: Arc<dyn PriceProvider>,
        config: ScanConfig,
    ) -> Self {
        Self {
            universe,
            prices,
            config,
            metrics: None,
        }
    }

    /// Build providers and parameters from the environment.
    pub fn from_env() -> Result<Self, ScanError> {
        let config = ScanConfig::from_env()?;

        let universe: Arc<dyn UniverseProvider> = match UniverseSource::from_env() {
            UniverseSource::Symbols(symbols) => {
                info!(count = symbols.len(), "Universe: {} symbols from SYMBOLS", symbols.len());
                Arc::new(StaticUniverse::new(symbols))
            }
            UniverseSource::Url { url, column } => {
                info!(url = %url, column = %column, "Universe: CSV listing");
                Arc::new(CsvUniverseProvider::new(url, column))
            }
        };

        let prices: Arc<dyn PriceProvider> = match PriceSource::from_env()? {
            PriceSource::Yahoo { base_url } => {
                info!(url = %base_url, "Prices: chart API");
                let provider = YahooPriceProvider::new(&base_url)
                    .map_err(|e| ScanError::Config(e.to_string()))?;
                Arc::new(provider)
            }
            PriceSource::CsvDirectory(dir) => {
                info!(directory = %dir.display(), "Prices: CSV directory");
                Arc::new(CsvDirectoryPriceProvider::new(dir))
            }
        };

        Ok(Self::new(universe, prices, config))
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run one scan over the current universe.
    pub async fn run_once(&self) -> Result<ScanReport, ScanError> {
        let universe = self
            .universe
            .fetch_universe()
            .await
            .map_err(|e| ScanError::Universe(e.to_string()))?;
        if universe.is_empty() {
            error!("Universe provider returned no tickers");
            return Err(ScanError::EmptyUniverse);
        }

        info!(
            symbols = universe.len(),
            window = self.config.window,
            concurrency = self.config.concurrency,
            "Scanning {} symbols (window {})",
            universe.len(),
            self.config.window
        );

        let start = Instant::now();
        let result = build_comparison_table(&universe, self.prices.as_ref(), &self.config).await;
        let elapsed = start.elapsed();

        if let Some(ref metrics) = self.metrics {
            metrics
                .scan_duration_seconds
                .observe(elapsed.as_secs_f64());
            match &result {
                Ok(report) => {
                    metrics.scan_runs_total.with_label_values(&["ok"]).inc();
                    metrics.scan_symbols_total.inc_by(report.attempted() as u64);
                    for diagnostic in &report.diagnostics {
                        metrics
                            .scan_symbol_failures_total
                            .with_label_values(&[diagnostic.kind.as_str()])
                            .inc();
                    }
                    if let Some(average) = report.stats.average_rsi {
                        metrics.scan_average_rsi.set(average);
                    }
                }
                Err(e) => {
                    // one failed run, whatever the universe size
                    metrics.scan_runs_total.with_label_values(&[e.kind()]).inc();
                    if let ScanError::ProviderOutage { attempted } = e {
                        metrics.scan_symbols_total.inc_by(*attempted as u64);
                    }
                }
            }
        }

        match &result {
            Ok(report) => info!(
                duration_ms = elapsed.as_millis() as u64,
                included = report.table.len(),
                skipped = report.diagnostics.len(),
                "Scan finished in {:?}",
                elapsed
            ),
            Err(e) => error!(error = %e, kind = e.kind(), "Scan failed"),
        }

        result
    }
}
