//! Watchlist Module
//!
//! Per-ticker quote rows with the latest RSI, built in input order. A ticker
//! that fails becomes an error row instead of aborting the batch.

pub mod aggregator;
pub mod models;

pub use aggregator::{build_watchlist, format_range, parse_tickers};
pub use models::{QuoteRow, SparkPoint, WatchlistParams, WatchlistRow};
