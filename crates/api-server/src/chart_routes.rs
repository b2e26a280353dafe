//! Chart API Routes

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use radar_core::{with_timeout, ChartStyle, Granularity, HistoryRange, RadarError};
use serde::Deserialize;
use technical_analysis::{build_chart, ChartPayload};

use crate::watchlist_routes::parse_or_default;
use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct ChartQuery {
    pub granularity: Option<String>,
    pub range: Option<String>,
    pub style: Option<String>,
}

pub fn chart_routes() -> Router<AppState> {
    Router::new().route("/api/chart/:symbol", get(get_chart))
}

async fn get_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<ChartPayload>>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(RadarError::InvalidInput("ticker symbol is empty".to_string()).into());
    }
    let granularity = parse_or_default::<Granularity>(query.granularity.as_deref())?;
    let range = parse_or_default::<HistoryRange>(query.range.as_deref())?;
    let style = parse_or_default::<ChartStyle>(query.style.as_deref())?;

    let series = with_timeout(
        &symbol,
        state.config.fetch_timeout,
        state.source.price_history(&symbol, granularity, range),
    )
    .await?;
    if series.is_empty() {
        return Err(RadarError::MissingData(format!("no price history for {} over {}", symbol, range)).into());
    }

    let chart = build_chart(&symbol, &series, style, granularity, range, state.config.rsi_window);
    Ok(Json(ApiResponse::success(chart)))
}
