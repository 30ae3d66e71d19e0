//! Plotly figure for the comparison table.
//!
//! The page loads plotly.js from its CDN and draws:
//! - three background bands for the oversold, neutral and overbought zones
//! - one marker per ticker at its latest RSI
//! - a dashed segment per ticker from the prior-day RSI to the latest
//! - a horizontal line at the cross-sectional average

use crate::error::RenderError;
use crate::models::comparison::{ScanReport, OVERBOUGHT_THRESHOLD, OVERSOLD_THRESHOLD};
use serde_json::{json, Value};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const CHART_HEIGHT: u32 = 600;
const CHART_WIDTH: u32 = 1200;

struct Zone {
    name: &'static str,
    lower: f64,
    upper: f64,
    fill: &'static str,
}

const ZONES: [Zone; 3] = [
    Zone {
        name: "Overbought",
        lower: OVERBOUGHT_THRESHOLD,
        upper: 100.0,
        fill: "rgba(255, 0, 0, 0.1)",
    },
    Zone {
        name: "Neutral",
        lower: OVERSOLD_THRESHOLD,
        upper: OVERBOUGHT_THRESHOLD,
        fill: "rgba(0, 255, 0, 0.1)",
    },
    Zone {
        name: "Oversold",
        lower: 0.0,
        upper: OVERSOLD_THRESHOLD,
        fill: "rgba(0, 0, 255, 0.1)",
    },
];

/// Figure JSON with `data` and `layout` keys, as `Plotly.newPlot` expects.
pub fn build_figure(report: &ScanReport, title: &str) -> Value {
    let rows = report.table.rows();
    let x_end = rows.len() as f64 - 0.5;

    let mut shapes: Vec<Value> = ZONES
        .iter()
        .map(|zone| {
            json!({
                "type": "rect",
                "xref": "x",
                "yref": "y",
                "x0": -0.5,
                "x1": x_end,
                "y0": zone.lower,
                "y1": zone.upper,
                "fillcolor": zone.fill,
                "line": { "width": 0 },
                "layer": "below",
                "name": zone.name,
            })
        })
        .collect();

    let tickers: Vec<&str> = rows.iter().map(|r| r.ticker.as_str()).collect();
    let latest: Vec<Option<f64>> = rows.iter().map(|r| r.rsi).collect();
    let marker_colors: Vec<Option<f64>> = latest.iter().map(|v| v.map(|rsi| 100.0 - rsi)).collect();

    let mut data = vec![json!({
        "type": "scatter",
        "x": tickers,
        "y": latest,
        "mode": "markers",
        "marker": {
            "size": 10,
            "color": marker_colors,
            "colorscale": "RdYlGn",
        },
        "name": "RSI Actual",
    })];

    for row in rows {
        let (Some(rsi), Some(prev)) = (row.rsi, row.prev_rsi) else {
            continue;
        };
        let color = if prev < rsi { "green" } else { "red" };
        data.push(json!({
            "type": "scatter",
            "x": [row.ticker, row.ticker],
            "y": [prev, rsi],
            "mode": "lines",
            "line": { "color": color, "width": 1, "dash": "dash" },
            "showlegend": false,
            "hoverinfo": "skip",
        }));
    }

    let mut annotations = Vec::new();
    if let Some(average) = report.stats.average_rsi {
        shapes.push(json!({
            "type": "line",
            "xref": "paper",
            "yref": "y",
            "x0": 0,
            "x1": 1,
            "y0": average,
            "y1": average,
            "line": { "color": "orange", "width": 2, "dash": "dash" },
            "name": "Average RSI",
        }));
        annotations.push(json!({
            "xref": "paper",
            "yref": "y",
            "x": 1,
            "y": average,
            "xanchor": "right",
            "yanchor": "bottom",
            "showarrow": false,
            "text": format!("Average RSI: {:.2}", average),
        }));
    }

    json!({
        "data": data,
        "layout": {
            "title": { "text": title },
            "xaxis": { "title": { "text": "Tickers" } },
            "yaxis": { "title": { "text": "RSI" }, "range": [0, 100] },
            "plot_bgcolor": "white",
            "paper_bgcolor": "white",
            "height": CHART_HEIGHT,
            "width": CHART_WIDTH,
            "shapes": shapes,
            "annotations": annotations,
        },
    })
}

/// Self-contained HTML page drawing the figure.
pub fn render_html(report: &ScanReport, title: &str) -> Result<String, RenderError> {
    let figure = serde_json::to_string(&build_figure(report, title))?;
    // keep ticker text from closing the script element
    let figure = figure.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="rsi-chart"></div>
<script>
const figure = {figure};
Plotly.newPlot("rsi-chart", figure.data, figure.layout);
</script>
</body>
</html>
"#,
        title = escape_html(title),
        cdn = PLOTLY_CDN,
        figure = figure,
    ))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
