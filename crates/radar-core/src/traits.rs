use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::{Granularity, HistoryRange, PeriodSet, PriceSeries, RadarError, ReportingCadence, TickerInfo};

/// Provider of raw per-ticker market data
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Attribute map for a ticker: quote, ranges, ratios, analyst targets
    async fn ticker_info(&self, symbol: &str) -> Result<TickerInfo, RadarError>;

    /// The three financial statements at one reporting cadence
    async fn statements(&self, symbol: &str, cadence: ReportingCadence) -> Result<PeriodSet, RadarError>;

    /// OHLCV history sampled at `granularity` over `range`
    async fn price_history(
        &self,
        symbol: &str,
        granularity: Granularity,
        range: HistoryRange,
    ) -> Result<PriceSeries, RadarError>;
}

/// Bounds a single data-source call, reporting expiry as [`RadarError::Timeout`].
pub async fn with_timeout<T, F>(symbol: &str, limit: Duration, call: F) -> Result<T, RadarError>
where
    F: Future<Output = Result<T, RadarError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(RadarError::Timeout {
            symbol: symbol.to_string(),
            elapsed_ms: limit.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let value = with_timeout("AAPL", Duration::from_secs(1), async { Ok::<_, RadarError>(7) }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout("SLOW", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, RadarError>(())
        })
        .await;
        assert_eq!(
            result,
            Err(RadarError::Timeout { symbol: "SLOW".to_string(), elapsed_ms: 10 })
        );
    }
}
