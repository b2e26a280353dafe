use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadarError {
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Failed to fetch {symbol}: {reason}")]
    FetchFailure { symbol: String, reason: String },

    #[error("Timed out fetching {symbol} after {elapsed_ms}ms")]
    Timeout { symbol: String, elapsed_ms: u64 },

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl RadarError {
    pub fn fetch(symbol: &str, reason: impl Into<String>) -> Self {
        RadarError::FetchFailure {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    /// True for faults that say nothing about the ticker itself, only about
    /// reaching the data source.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            RadarError::Timeout { .. } | RadarError::Transport(_) | RadarError::SourceUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        assert!(RadarError::Transport("reset".into()).is_connectivity());
        assert!(RadarError::Timeout { symbol: "AAPL".into(), elapsed_ms: 10 }.is_connectivity());
        assert!(!RadarError::fetch("BAD", "no such ticker").is_connectivity());
        assert!(!RadarError::ApiError("HTTP 500".into()).is_connectivity());
    }

    #[test]
    fn test_fetch_failure_message() {
        let err = RadarError::fetch("BAD", "quote not found");
        assert_eq!(err.to_string(), "Failed to fetch BAD: quote not found");
    }
}
