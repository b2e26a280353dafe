//! Research API Routes
//!
//! Company profile, KPI table and normalized financial statements.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use fundamental_analysis::{build_report, extract_kpis, KpiEntry, ResearchReport};
use radar_core::{with_timeout, RadarError, ReportingCadence};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct ResearchQuery {
    pub cadence: Option<String>,
}

pub fn research_routes() -> Router<AppState> {
    Router::new()
        .route("/api/research/:symbol", get(get_research))
        .route("/api/kpis/:symbol", get(get_kpis))
}

async fn get_research(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ResearchQuery>,
) -> Result<Json<ApiResponse<ResearchReport>>, AppError> {
    let cadence = match query.cadence.as_deref() {
        Some(raw) => raw.parse::<ReportingCadence>()?,
        None => ReportingCadence::default(),
    };

    let report = build_report(state.source.as_ref(), &symbol, cadence, state.config.fetch_timeout).await?;
    Ok(Json(ApiResponse::success(report)))
}

async fn get_kpis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Vec<KpiEntry>>>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(RadarError::InvalidInput("ticker symbol is empty".to_string()).into());
    }

    let info = with_timeout(&symbol, state.config.fetch_timeout, state.source.ticker_info(&symbol)).await?;
    Ok(Json(ApiResponse::success(extract_kpis(&info))))
}
