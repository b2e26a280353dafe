use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Bound on each data-source call made while serving a request
    pub fetch_timeout: Duration,
    pub rsi_window: usize,
    /// Yahoo requests per minute
    pub yahoo_rate_limit: usize,
    pub yahoo_http_timeout: Duration,
    /// Allowed CORS origin; any origin when unset
    pub cors_allow_origin: Option<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8052)),
            fetch_timeout: Duration::from_secs(10),
            rsi_window: technical_analysis::DEFAULT_RSI_WINDOW,
            yahoo_rate_limit: 120,
            yahoo_http_timeout: Duration::from_secs(30),
            cors_allow_origin: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = var("BIND_ADDR", "0.0.0.0:8052")
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8052")?;
        let fetch_timeout_secs: u64 = var("FETCH_TIMEOUT_SECS", "10")
            .parse()
            .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?;
        let rsi_window: usize = var("RSI_WINDOW", "14")
            .parse()
            .context("RSI_WINDOW must be a positive integer")?;
        let yahoo_rate_limit: usize = var("YAHOO_RATE_LIMIT", "120")
            .parse()
            .context("YAHOO_RATE_LIMIT must be a positive integer")?;
        let yahoo_http_timeout_secs: u64 = var("YAHOO_HTTP_TIMEOUT_SECS", "30")
            .parse()
            .context("YAHOO_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        let cors_allow_origin = lookup("CORS_ALLOW_ORIGIN")
            .filter(|v| !v.trim().is_empty())
            .map(|v| HeaderValue::from_str(v.trim()))
            .transpose()
            .context("CORS_ALLOW_ORIGIN must be a valid header value")?;

        if rsi_window == 0 {
            bail!("RSI_WINDOW must be at least 1");
        }
        if fetch_timeout_secs == 0 {
            bail!("FETCH_TIMEOUT_SECS must be at least 1");
        }

        Ok(Self {
            bind_addr,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            rsi_window,
            yahoo_rate_limit,
            yahoo_http_timeout: Duration::from_secs(yahoo_http_timeout_secs),
            cors_allow_origin,
        })
    }
}
