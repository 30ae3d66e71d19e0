//! Prometheus metrics for the HTTP surface and the scan pipeline.

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub scan_symbols_total: IntCounter,
    pub scan_symbol_failures_total: IntCounterVec,
    pub scan_runs_total: IntCounterVec,
    pub scan_duration_seconds: Histogram,
    pub scan_average_rsi: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let scan_symbols_total = IntCounter::new(
            "rsi_scan_symbols_total",
            "Symbols attempted across all scans",
        )?;
        let scan_symbol_failures_total = IntCounterVec::new(
            Opts::new(
                "rsi_scan_symbol_failures_total",
                "Symbols skipped during a scan, by failure kind",
            ),
            &["kind"],
        )?;
        let scan_runs_total = IntCounterVec::new(
            Opts::new("rsi_scan_runs_total", "Completed scan runs, by outcome"),
            &["outcome"],
        )?;
        let scan_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("rsi_scan_duration_seconds", "Wall time of a full scan")
                .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0]),
        )?;
        let scan_average_rsi = Gauge::new(
            "rsi_scan_average",
            "Cross-sectional average RSI of the latest scan",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(scan_symbols_total.clone()))?;
        registry.register(Box::new(scan_symbol_failures_total.clone()))?;
        registry.register(Box::new(scan_runs_total.clone()))?;
        registry.register(Box::new(scan_duration_seconds.clone()))?;
        registry.register(Box::new(scan_average_rsi.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            scan_symbols_total,
            scan_symbol_failures_total,
            scan_runs_total,
            scan_duration_seconds,
            scan_average_rsi,
        })
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
