//! HTTP surface of the stock radar: research, KPI, watchlist and chart data
//! as JSON for the presentation layer.

pub mod chart_routes;
pub mod config;
pub mod options_routes;
pub mod research_routes;
pub mod watchlist_routes;

#[cfg(test)]
#[path = "routes_tests.rs"]
mod routes_tests;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use radar_core::{MarketDataSource, RadarError};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use yahoo_client::YahooClient;

pub use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MarketDataSource>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(source: Arc<dyn MarketDataSource>, config: ServerConfig) -> Self {
        Self {
            source,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Handler error carrying the status it should be reported with.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: impl Into<anyhow::Error>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<RadarError> for AppError {
    fn from(error: RadarError) -> Self {
        let status = match &error {
            RadarError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RadarError::MissingData(_) | RadarError::FetchFailure { .. } => StatusCode::NOT_FOUND,
            RadarError::Transport(_) | RadarError::ApiError(_) => StatusCode::BAD_GATEWAY,
            RadarError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RadarError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        };
        Self::with_status(status, error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed ({}): {:#}", self.status, self.error);
        } else {
            tracing::debug!("Request rejected ({}): {:#}", self.status, self.error);
        }

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(format!("{:#}", self.error)),
        };
        (self.status, Json(body)).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match &config.cors_allow_origin {
        Some(origin) => layer.allow_origin(origin.clone()),
        None => layer.allow_origin(Any),
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health))
        .merge(research_routes::research_routes())
        .merge(watchlist_routes::watchlist_routes())
        .merge(chart_routes::chart_routes())
        .merge(options_routes::options_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    let source = YahooClient::new(config.yahoo_rate_limit, config.yahoo_http_timeout)?;
    let bind_addr = config.bind_addr;
    let app = build_router(AppState::new(Arc::new(source), config));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Stock radar API listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
