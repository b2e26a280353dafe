//! Chart payloads: price trace, volume bars and the RSI panel for one ticker.

use chrono::{DateTime, Utc};
use radar_core::{ChartStyle, Granularity, HistoryRange, PriceSeries, Tone};
use serde::Serialize;

use crate::indicators::{rsi, IndicatorSeries};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum PriceTrace {
    Line {
        close: Vec<f64>,
    },
    Candlestick {
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
}

/// Volume of one sample, toned up when the sample closed at or above its open
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeBar {
    pub volume: f64,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub symbol: String,
    pub title: String,
    pub granularity: Granularity,
    pub range: HistoryRange,
    pub timestamps: Vec<DateTime<Utc>>,
    pub price: PriceTrace,
    pub volume: Vec<VolumeBar>,
    pub rsi_window: usize,
    pub rsi: IndicatorSeries,
}

pub fn chart_title(symbol: &str, granularity: Granularity, range: HistoryRange) -> String {
    format!("{} Trends ({} Interval, {} Duration)", symbol, granularity, range)
}

pub fn build_chart(
    symbol: &str,
    series: &PriceSeries,
    style: ChartStyle,
    granularity: Granularity,
    range: HistoryRange,
    rsi_window: usize,
) -> ChartPayload {
    let bars = series.bars();
    let close = series.closes();

    let price = match style {
        ChartStyle::Line => PriceTrace::Line { close: close.clone() },
        ChartStyle::Candlestick => PriceTrace::Candlestick {
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: close.clone(),
        },
    };

    let volume = bars
        .iter()
        .map(|b| VolumeBar {
            volume: b.volume,
            tone: if b.close >= b.open { Tone::Positive } else { Tone::Negative },
        })
        .collect();

    ChartPayload {
        symbol: symbol.to_string(),
        title: chart_title(symbol, granularity, range),
        granularity,
        range,
        timestamps: series.timestamps(),
        price,
        volume,
        rsi_window,
        rsi: rsi(&close, rsi_window),
    }
}
