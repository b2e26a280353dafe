//! Watchlist Data Models

use chrono::{DateTime, Utc};
use radar_core::{Granularity, HistoryRange, Tone};
use serde::Serialize;
use std::time::Duration;
use technical_analysis::DEFAULT_RSI_WINDOW;

/// Request parameters shared by every ticker of one batch
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistParams {
    pub granularity: Granularity,
    pub range: HistoryRange,
    pub rsi_window: usize,
    /// Upper bound on each data-source call
    pub fetch_timeout: Duration,
}

impl Default for WatchlistParams {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            range: HistoryRange::default(),
            rsi_window: DEFAULT_RSI_WINDOW,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// One close of the sparkline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SparkPoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Current snapshot of one ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRow {
    pub ticker: String,
    /// Short company name, or the ticker when the source has none
    pub name: String,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    /// `current_price - previous_close`, only when both are known
    pub price_change: Option<f64>,
    pub trend: Tone,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub day_range: String,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_range: String,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub beta: Option<f64>,
    pub target_low: Option<f64>,
    pub target_mean: Option<f64>,
    pub target_high: Option<f64>,
    pub target_range: String,
    /// Close and open of the newest history sample
    pub last_close: Option<f64>,
    pub last_open: Option<f64>,
    pub close_minus_open: Option<f64>,
    /// Latest RSI of the fetched history
    pub rsi: Option<f64>,
    pub sparkline: Vec<SparkPoint>,
}

/// Slot of the watchlist: a quote, or the reason the ticker could not be
/// quoted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WatchlistRow {
    Quote(QuoteRow),
    Error { ticker: String, reason: String },
}

impl WatchlistRow {
    pub fn ticker(&self) -> &str {
        match self {
            WatchlistRow::Quote(row) => &row.ticker,
            WatchlistRow::Error { ticker, .. } => ticker,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WatchlistRow::Error { .. })
    }

    pub fn quote(&self) -> Option<&QuoteRow> {
        match self {
            WatchlistRow::Quote(row) => Some(row),
            WatchlistRow::Error { .. } => None,
        }
    }
}
