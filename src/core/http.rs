//! HTTP surface for the latest scan, using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::core::runtime::ScanRuntime;
use crate::metrics::Metrics;
use crate::models::comparison::{ScanReport, SymbolResult};
use crate::render::chart::render_html;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub report: Arc<RwLock<Option<ScanReport>>>,
    pub chart_title: Arc<String>,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>, chart_title: impl Into<String>) -> Self {
        Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            report: Arc::new(RwLock::new(None)),
            chart_title: Arc::new(chart_title.into()),
        }
    }

    pub async fn publish(&self, report: ScanReport) {
        *self.report.write().await = Some(report);
    }

    /// Run a scan in the background and publish its report when it succeeds.
    ///
    /// Report endpoints keep answering 503 if the scan fails.
    pub fn spawn_scan(&self, runtime: ScanRuntime) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            match runtime.run_once().await {
                Ok(report) => {
                    info!(included = report.table.len(), "Scan report published");
                    state.publish(report).await;
                }
                Err(e) => {
                    warn!(error = %e, "Scan failed, report endpoints will answer 503");
                }
            }
        })
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let report = state.report.read().await;
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "service": "rsi-heatmap",
        "last_scan": report.as_ref().map(|r| r.generated_at),
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis() as u64,
            "HTTP request error"
        );
    }

    response
}

/// Full report: table, statistics and skipped symbols
async fn get_report(State(state): State<AppState>) -> Result<Json<ScanReport>, StatusCode> {
    let report = state.report.read().await;
    report
        .as_ref()
        .cloned()
        .map(Json)
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

async fn get_symbol(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<SymbolResult>, StatusCode> {
    let report = state.report.read().await;
    let report = report.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    report
        .table
        .get(&ticker)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_chart(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let report = state.report.read().await;
    let report = report.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    render_html(report, &state.chart_title).map(Html).map_err(|e| {
        error!(error = %e, "Failed to render chart");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/rsi", get(get_report))
        .route("/api/rsi/{ticker}", get(get_symbol))
        .route("/chart", get(get_chart))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!("Chart available at http://0.0.0.0:{}/chart", port);
    axum::serve(listener, app).await?;

    Ok(())
}
