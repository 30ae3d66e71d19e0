//! One-shot RSI scan
//!
//! Fetches the universe and daily closes, computes every symbol's RSI and
//! writes the comparison chart and table to `OUTPUT_DIR`.

use dotenvy::dotenv;
use rsi_heatmap::config;
use rsi_heatmap::core::runtime::ScanRuntime;
use rsi_heatmap::logging;
use rsi_heatmap::render::write_report;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting RSI heatmap scan");
    info!(environment = %env, "Environment");

    let runtime = ScanRuntime::from_env()?;
    let report = runtime.run_once().await?;

    if !report.diagnostics.is_empty() {
        warn!(
            skipped = report.diagnostics.len(),
            "{} symbols were skipped, see warnings above",
            report.diagnostics.len()
        );
    }

    let output_dir = config::get_output_dir();
    let paths = write_report(&report, &output_dir, &config::get_chart_title())?;

    match report.stats.average_rsi {
        Some(average) => info!(
            average_rsi = average,
            overbought = report.stats.overbought,
            oversold = report.stats.oversold,
            "Average RSI {:.2} across {} symbols",
            average,
            report.stats.defined
        ),
        None => warn!("No defined RSI values, average is undefined"),
    }
    info!(chart = %paths.chart.display(), table = %paths.table.display(), "Report written");

    Ok(())
}
