//! RSI Heatmap API Server
//!
//! Runs one scan at startup and serves the result: JSON table, chart page,
//! health and Prometheus metrics.

use dotenvy::dotenv;
use rsi_heatmap::config;
use rsi_heatmap::core::http::{start_server, AppState};
use rsi_heatmap::core::runtime::ScanRuntime;
use rsi_heatmap::logging;
use rsi_heatmap::metrics::Metrics;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let port = config::get_port()?;
    let env = config::get_environment();
    info!("Starting RSI Heatmap API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let metrics = Arc::new(Metrics::new()?);
    let state = AppState::new(metrics.clone(), config::get_chart_title());
    let runtime = ScanRuntime::from_env()?.with_metrics(metrics);

    let scan_handle = state.spawn_scan(runtime);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            scan_handle.abort();
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
