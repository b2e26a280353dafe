//! `MarketDataSource` backed by the public Yahoo Finance endpoints.

pub mod parse;

use async_trait::async_trait;
use chrono::Utc;
use radar_core::{
    Granularity, HistoryRange, MarketDataSource, PeriodSet, PriceSeries, RadarError, ReportingCadence, TickerInfo,
};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub use parse::{parse_chart, parse_quote_summary, parse_timeseries, timeseries_types};

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const TIMESERIES_URL: &str = "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Earliest period requested from the fundamentals time series (1985-08-23)
const TIMESERIES_START: i64 = 493_590_046;

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait until the oldest request falls out of the window
            let sleep_dur = match ts.front() {
                Some(&oldest) => (oldest + self.window).duration_since(now) + Duration::from_millis(50),
                None => Duration::from_millis(50),
            };
            drop(ts);
            tracing::debug!("Rate limiter: waiting {:.1}s for Yahoo slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    rate_limiter: RateLimiter,
    /// Session crumb for quoteSummary, fetched on first use
    crumb: Arc<Mutex<Option<String>>>,
}

impl YahooClient {
    /// `rate_limit` is requests per minute; `http_timeout` bounds each HTTP
    /// exchange.
    pub fn new(rate_limit: usize, http_timeout: Duration) -> Result<Self, RadarError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(http_timeout)
            .build()
            .map_err(|e| RadarError::ApiError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
            crumb: Arc::new(Mutex::new(None)),
        })
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, RadarError> {
        let request = builder.build().map_err(|e| RadarError::ApiError(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| RadarError::ApiError("Cannot clone request".to_string()))?;
            let response = self.client.execute(req_clone).await.map_err(transport_error)?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let wait_secs = 5u64 * (attempt as u64 + 1);
            tracing::warn!("Yahoo 429 rate limited, waiting {}s before retry {}/3", wait_secs, attempt + 1);
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(RadarError::SourceUnavailable("Rate limited by Yahoo after 3 retries".to_string()))
    }

    /// Reads a JSON body. 404 bodies still carry Yahoo's own error object, so
    /// they are handed to the parser rather than rejected here.
    async fn read_json(response: reqwest::Response) -> Result<Value, RadarError> {
        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(RadarError::ApiError(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }
        response.json().await.map_err(|e| RadarError::ApiError(e.to_string()))
    }

    async fn crumb(&self) -> Result<String, RadarError> {
        let mut slot = self.crumb.lock().await;
        if let Some(crumb) = slot.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie host answers 404 but sets the session cookie
        self.send_request(self.client.get(COOKIE_URL)).await?;
        let response = self.send_request(self.client.get(CRUMB_URL)).await?;
        if !response.status().is_success() {
            return Err(RadarError::ApiError(format!("HTTP {} fetching crumb", response.status())));
        }
        let crumb = response.text().await.map_err(transport_error)?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(RadarError::ApiError("Yahoo returned no crumb".to_string()));
        }

        tracing::debug!("Obtained Yahoo session crumb");
        *slot = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    async fn quote_summary(&self, symbol: &str) -> Result<Value, RadarError> {
        let url = endpoint(QUOTE_SUMMARY_URL, symbol)?;
        let modules = parse::SUMMARY_MODULES.join(",");

        for attempt in 0..2 {
            let crumb = self.crumb().await?;
            let response = self
                .send_request(
                    self.client
                        .get(url.clone())
                        .query(&[("modules", modules.as_str()), ("crumb", crumb.as_str())]),
                )
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED && attempt == 0 {
                tracing::debug!("Yahoo crumb rejected for {}, refreshing", symbol);
                self.invalidate_crumb().await;
                continue;
            }
            return Self::read_json(response).await;
        }

        Err(RadarError::ApiError("Yahoo rejected the session crumb".to_string()))
    }
}

/// `base/SYMBOL` with the symbol percent-encoded as one path segment
fn endpoint(base: &str, symbol: &str) -> Result<Url, RadarError> {
    let mut url = Url::parse(base).map_err(|e| RadarError::ApiError(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| RadarError::ApiError(format!("cannot append path to {}", base)))?
        .push(symbol);
    Ok(url)
}

fn transport_error(e: reqwest::Error) -> RadarError {
    RadarError::Transport(e.to_string())
}

#[async_trait]
impl MarketDataSource for YahooClient {
    async fn ticker_info(&self, symbol: &str) -> Result<TickerInfo, RadarError> {
        tracing::debug!("Fetching quote summary for {}", symbol);
        let body = self.quote_summary(symbol).await?;
        parse_quote_summary(symbol, &body)
    }

    async fn statements(&self, symbol: &str, cadence: ReportingCadence) -> Result<PeriodSet, RadarError> {
        tracing::debug!("Fetching {} statements for {}", cadence, symbol);
        let url = endpoint(TIMESERIES_URL, symbol)?;
        let types = timeseries_types(cadence).join(",");
        let period1 = TIMESERIES_START.to_string();
        let period2 = Utc::now().timestamp().to_string();

        let response = self
            .send_request(self.client.get(url).query(&[
                ("symbol", symbol),
                ("type", types.as_str()),
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
            ]))
            .await?;

        let body = Self::read_json(response).await?;
        parse_timeseries(symbol, &body, cadence)
    }

    async fn price_history(
        &self,
        symbol: &str,
        granularity: Granularity,
        range: HistoryRange,
    ) -> Result<PriceSeries, RadarError> {
        tracing::debug!("Fetching {} {} chart for {}", range, granularity, symbol);
        let url = endpoint(CHART_URL, symbol)?;

        let response = self
            .send_request(self.client.get(url).query(&[
                ("interval", granularity.as_str()),
                ("range", range.as_str()),
                ("includePrePost", "false"),
            ]))
            .await?;

        let body = Self::read_json(response).await?;
        parse_chart(symbol, &body)
    }
}
