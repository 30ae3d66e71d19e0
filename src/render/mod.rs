//! Renderers consuming a finished scan report.

pub mod chart;
pub mod export;

pub use chart::{build_figure, render_html};
pub use export::{write_report, write_table_csv, ReportPaths};
