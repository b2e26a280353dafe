//! Watchlist Aggregator
//!
//! Builds one row per requested ticker, sequentially and in input order.

use radar_core::{with_timeout, MarketDataSource, RadarError, Tone};
use technical_analysis::latest_rsi;

use crate::models::{QuoteRow, SparkPoint, WatchlistParams, WatchlistRow};

const NOT_AVAILABLE: &str = "N/A";

/// Splits comma-separated user input into ticker symbols.
///
/// Symbols are trimmed and upper-cased; empty segments are dropped. Order and
/// duplicates are kept.
pub fn parse_tickers(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `"low - high"`, with `N/A` standing in for a missing end
pub fn format_range(low: Option<f64>, high: Option<f64>) -> String {
    let end = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!("{} - {}", end(low), end(high))
}

/// Builds the watchlist for `tickers`.
///
/// The result always has one row per ticker in the same order, duplicates
/// included. A ticker whose fetch fails becomes [`WatchlistRow::Error`]. Only
/// when every ticker of a non-empty batch fails on connectivity is the batch
/// itself an error ([`RadarError::SourceUnavailable`]).
pub async fn build_watchlist(
    source: &dyn MarketDataSource,
    tickers: &[String],
    params: &WatchlistParams,
) -> Result<Vec<WatchlistRow>, RadarError> {
    tracing::info!(
        "Building watchlist for {} tickers ({} interval, {} range)",
        tickers.len(),
        params.granularity,
        params.range
    );

    let mut rows = Vec::with_capacity(tickers.len());
    let mut connectivity_failures = 0;
    let mut last_failure = None;

    for ticker in tickers {
        match quote_row(source, ticker, params).await {
            Ok(row) => rows.push(WatchlistRow::Quote(row)),
            Err(e) => {
                tracing::warn!("Failed to quote {}: {}", ticker, e);
                if e.is_connectivity() {
                    connectivity_failures += 1;
                }
                rows.push(WatchlistRow::Error {
                    ticker: ticker.clone(),
                    reason: e.to_string(),
                });
                last_failure = Some(e);
            }
        }
    }

    if !tickers.is_empty() && connectivity_failures == tickers.len() {
        let reason = last_failure.map(|e| e.to_string()).unwrap_or_default();
        tracing::warn!("Data source unreachable for every ticker: {}", reason);
        return Err(RadarError::SourceUnavailable(reason));
    }

    let failed = rows.iter().filter(|r| r.is_error()).count();
    tracing::info!("Watchlist built: {} rows, {} failed", rows.len(), failed);

    Ok(rows)
}

async fn quote_row(
    source: &dyn MarketDataSource,
    ticker: &str,
    params: &WatchlistParams,
) -> Result<QuoteRow, RadarError> {
    if ticker.trim().is_empty() {
        return Err(RadarError::InvalidInput("ticker symbol is empty".to_string()));
    }

    let info = with_timeout(ticker, params.fetch_timeout, source.ticker_info(ticker)).await?;
    let history = with_timeout(
        ticker,
        params.fetch_timeout,
        source.price_history(ticker, params.granularity, params.range),
    )
    .await?;

    let current_price = info.get_f64("currentPrice");
    let previous_close = info.get_f64("previousClose");
    let price_change = match (current_price, previous_close) {
        (Some(current), Some(previous)) => Some(current - previous),
        _ => None,
    };
    let trend = match price_change {
        Some(change) if change >= 0.0 => Tone::Positive,
        Some(_) => Tone::Negative,
        None => Tone::Neutral,
    };

    let day_low = info.get_f64("dayLow");
    let day_high = info.get_f64("dayHigh");
    let fifty_two_week_low = info.get_f64("fiftyTwoWeekLow");
    let fifty_two_week_high = info.get_f64("fiftyTwoWeekHigh");
    let target_low = info.get_f64("targetLowPrice");
    let target_high = info.get_f64("targetHighPrice");

    let last = history.last();
    let last_close = last.map(|bar| bar.close);
    let last_open = last.map(|bar| bar.open);

    let rsi = if history.is_empty() {
        None
    } else {
        latest_rsi(&history.closes(), params.rsi_window)
    };

    let sparkline = history
        .bars()
        .iter()
        .map(|bar| SparkPoint {
            timestamp: bar.timestamp,
            close: bar.close,
        })
        .collect();

    Ok(QuoteRow {
        ticker: ticker.to_string(),
        name: info
            .get_str("shortName")
            .map(str::to_string)
            .unwrap_or_else(|| ticker.to_string()),
        current_price,
        previous_close,
        open: info.get_f64("open"),
        price_change,
        trend,
        day_low,
        day_high,
        day_range: format_range(day_low, day_high),
        fifty_two_week_low,
        fifty_two_week_high,
        fifty_two_week_range: format_range(fifty_two_week_low, fifty_two_week_high),
        volume: info.get_f64("volume"),
        market_cap: info.get_f64("marketCap"),
        beta: info.get_f64("beta"),
        target_low,
        target_mean: info.get_f64("targetMeanPrice"),
        target_high,
        target_range: format_range(target_low, target_high),
        last_close,
        last_open,
        close_minus_open: last.map(|bar| bar.close - bar.open),
        rsi,
        sparkline,
    })
}
