use super::*;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use chrono::{TimeZone, Utc};
use radar_core::{
    Bar, Granularity, HistoryRange, PeriodSet, PriceSeries, ReportingCadence, TickerInfo,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Knows only AAPL; OFFLINE fails on connectivity, everything else is unknown
struct FakeSource;

#[async_trait]
impl MarketDataSource for FakeSource {
    async fn ticker_info(&self, symbol: &str) -> Result<TickerInfo, RadarError> {
        match symbol {
            "AAPL" => Ok(vec![
                ("longName", json!("Apple Inc.")),
                ("shortName", json!("Apple")),
                ("currentPrice", json!(190.0)),
                ("previousClose", json!(188.0)),
                ("returnOnEquity", json!(1.47)),
                ("beta", json!(1.24)),
            ]
            .into_iter()
            .collect()),
            "OFFLINE" => Err(RadarError::Transport("connection refused".to_string())),
            other => Err(RadarError::fetch(other, "Quote not found")),
        }
    }

    async fn statements(&self, _symbol: &str, cadence: ReportingCadence) -> Result<PeriodSet, RadarError> {
        Ok(PeriodSet::empty(cadence))
    }

    async fn price_history(
        &self,
        symbol: &str,
        _granularity: Granularity,
        _range: HistoryRange,
    ) -> Result<PriceSeries, RadarError> {
        if symbol != "AAPL" {
            return Ok(PriceSeries::default());
        }
        let bars = (0..30)
            .map(|i| {
                let close = 180.0 + (i % 5) as f64;
                Bar {
                    timestamp: Utc.timestamp_opt(1_700_000_000 + i * 3_600, 0).unwrap(),
                    open: close - 1.0,
                    high: close + 1.0,
                    low: close - 2.0,
                    close,
                    volume: 10_000.0,
                }
            })
            .collect();
        Ok(PriceSeries::from_bars(bars))
    }
}

fn app() -> Router {
    build_router(AppState::new(Arc::new(FakeSource), ServerConfig::default()))
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_research_report() {
    let (status, body) = get_json("/api/research/aapl?cadence=quarterly").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["symbol"], "AAPL");
    assert_eq!(body["data"]["cadence"], "quarterly");
    assert_eq!(body["data"]["kpis"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"]["statements"]["sections"][0]["statement"]["status"], "no_data");
}

#[tokio::test]
async fn test_research_rejects_unknown_cadence() {
    let (status, body) = get_json("/api/research/AAPL?cadence=monthly").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("monthly"));
}

#[tokio::test]
async fn test_kpis() {
    let (status, body) = get_json("/api/kpis/AAPL").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Return on Equity");
    assert_eq!(body["data"][0]["display"], "147 %");
    assert_eq!(body["data"][9]["display"], "1");
}

#[tokio::test]
async fn test_unknown_symbol_is_not_found() {
    let (status, body) = get_json("/api/kpis/ZZZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_watchlist_isolates_failures() {
    let (status, body) = get_json("/api/watchlist?tickers=aapl,zzzz,%20aapl&granularity=1h&range=5d").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["status"], "quote");
    assert_eq!(rows[0]["ticker"], "AAPL");
    assert_eq!(rows[0]["price_change"], 2.0);
    assert_eq!(rows[1]["status"], "error");
    assert_eq!(rows[1]["ticker"], "ZZZZ");
    assert_eq!(rows[2]["ticker"], "AAPL");
}

#[tokio::test]
async fn test_watchlist_requires_tickers() {
    let (status, _) = get_json("/api/watchlist?tickers=%20,").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_watchlist_source_unavailable() {
    let (status, body) = get_json("/api/watchlist?tickers=OFFLINE,OFFLINE").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_chart_candlestick() {
    let (status, body) = get_json("/api/chart/AAPL?granularity=1h&range=5d&style=candlestick").await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["title"], "AAPL Trends (1h Interval, 5d Duration)");
    assert_eq!(data["price"]["style"], "candlestick");
    assert_eq!(data["timestamps"].as_array().unwrap().len(), 30);
    assert_eq!(data["rsi"].as_array().unwrap().len(), 30);
    assert_eq!(data["volume"][0]["tone"], "positive");
}

#[tokio::test]
async fn test_chart_without_history_is_not_found() {
    let (status, _) = get_json("/api/chart/EMPTY").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_options() {
    let (status, body) = get_json("/api/options").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["granularities"]["default"], "1d");
    assert_eq!(body["data"]["ranges"]["choices"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["cadences"]["choices"][1]["value"], "quarterly");
}

#[test]
fn test_error_status_mapping() {
    let status = |e: RadarError| AppError::from(e).status();
    assert_eq!(status(RadarError::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(status(RadarError::fetch("X", "gone")), StatusCode::NOT_FOUND);
    assert_eq!(status(RadarError::ApiError("HTTP 500".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(status(RadarError::SourceUnavailable("down".into())), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        status(RadarError::Timeout {
            symbol: "X".into(),
            elapsed_ms: 10_000
        }),
        StatusCode::GATEWAY_TIMEOUT
    );
}
