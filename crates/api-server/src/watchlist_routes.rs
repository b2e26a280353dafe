//! Watchlist API Routes
//!
//! Quote rows for a comma-separated list of tickers.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use radar_core::{Granularity, HistoryRange, RadarError};
use serde::Deserialize;
use watchlist::{build_watchlist, parse_tickers, WatchlistParams, WatchlistRow};

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct WatchlistQuery {
    pub tickers: Option<String>,
    pub granularity: Option<String>,
    pub range: Option<String>,
}

pub fn watchlist_routes() -> Router<AppState> {
    Router::new().route("/api/watchlist", get(get_watchlist))
}

async fn get_watchlist(
    State(state): State<AppState>,
    Query(query): Query<WatchlistQuery>,
) -> Result<Json<ApiResponse<Vec<WatchlistRow>>>, AppError> {
    let tickers = parse_tickers(query.tickers.as_deref().unwrap_or_default());
    if tickers.is_empty() {
        return Err(RadarError::InvalidInput("at least one ticker is required".to_string()).into());
    }

    let params = WatchlistParams {
        granularity: parse_or_default::<Granularity>(query.granularity.as_deref())?,
        range: parse_or_default::<HistoryRange>(query.range.as_deref())?,
        rsi_window: state.config.rsi_window,
        fetch_timeout: state.config.fetch_timeout,
    };

    let rows = build_watchlist(state.source.as_ref(), &tickers, &params).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Parses an optional query value, falling back to the option's default
pub(crate) fn parse_or_default<T>(raw: Option<&str>) -> Result<T, RadarError>
where
    T: std::str::FromStr<Err = RadarError> + Default,
{
    raw.map(str::parse).unwrap_or_else(|| Ok(T::default()))
}
