use crate::error::RenderError;
use crate::models::comparison::{ComparisonTable, ScanReport};
use crate::render::chart::render_html;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CHART_FILE: &str = "rsi_heatmap.html";
pub const TABLE_FILE: &str = "rsi_table.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub chart: PathBuf,
    pub table: PathBuf,
}

/// `Ticker,RSI,Prev_RSI` rows; undefined values are empty cells.
pub fn write_table_csv<W: Write>(table: &ComparisonTable, writer: W) -> Result<(), RenderError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Ticker", "RSI", "Prev_RSI"])?;
    for row in table.iter() {
        csv.write_record([row.ticker.clone(), format_value(row.rsi), format_value(row.prev_rsi)])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the chart page and the table CSV under `dir`, creating it if needed.
pub fn write_report(report: &ScanReport, dir: &Path, title: &str) -> Result<ReportPaths, RenderError> {
    fs::create_dir_all(dir)?;

    let chart = dir.join(CHART_FILE);
    fs::write(&chart, render_html(report, title)?)?;

    let table = dir.join(TABLE_FILE);
    write_table_csv(&report.table, File::create(&table)?)?;

    Ok(ReportPaths { chart, table })
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}
