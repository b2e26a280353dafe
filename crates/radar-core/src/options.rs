//! User-selectable options threaded unmodified through to the data source.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::RadarError;

/// Reporting cadence for financial statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingCadence {
    #[default]
    Annual,
    Quarterly,
}

impl ReportingCadence {
    pub const ALL: [ReportingCadence; 2] = [ReportingCadence::Annual, ReportingCadence::Quarterly];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingCadence::Annual => "annual",
            ReportingCadence::Quarterly => "quarterly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportingCadence::Annual => "Annual",
            ReportingCadence::Quarterly => "Quarterly",
        }
    }
}

/// Sampling interval of a price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::OneMinute,
        Granularity::FifteenMinutes,
        Granularity::OneHour,
        Granularity::OneDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::OneMinute => "1m",
            Granularity::FifteenMinutes => "15m",
            Granularity::OneHour => "1h",
            Granularity::OneDay => "1d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::OneMinute => "1 Minute",
            Granularity::FifteenMinutes => "15 Minutes",
            Granularity::OneHour => "1 Hour",
            Granularity::OneDay => "1 Day",
        }
    }
}

/// Look-back duration of a price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryRange {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl HistoryRange {
    pub const ALL: [HistoryRange; 5] = [
        HistoryRange::OneDay,
        HistoryRange::FiveDays,
        HistoryRange::OneMonth,
        HistoryRange::ThreeMonths,
        HistoryRange::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRange::OneDay => "1d",
            HistoryRange::FiveDays => "5d",
            HistoryRange::OneMonth => "1mo",
            HistoryRange::ThreeMonths => "3mo",
            HistoryRange::OneYear => "1y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryRange::OneDay => "1 Day",
            HistoryRange::FiveDays => "5 Days",
            HistoryRange::OneMonth => "1 Month",
            HistoryRange::ThreeMonths => "3 Months",
            HistoryRange::OneYear => "1 Year",
        }
    }
}

/// How the main price chart is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Line,
    Candlestick,
}

impl ChartStyle {
    pub const ALL: [ChartStyle; 2] = [ChartStyle::Line, ChartStyle::Candlestick];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartStyle::Line => "line",
            ChartStyle::Candlestick => "candlestick",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartStyle::Line => "Line Chart",
            ChartStyle::Candlestick => "Candlestick Chart",
        }
    }
}

fn parse_option<T: Copy>(
    value: &str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
    kind: &str,
) -> Result<T, RadarError> {
    let wanted = value.trim();
    all.iter()
        .copied()
        .find(|option| as_str(option).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| RadarError::InvalidInput(format!("unknown {}: '{}'", kind, value)))
}

impl FromStr for ReportingCadence {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(s, &Self::ALL, Self::as_str, "reporting cadence")
    }
}

impl FromStr for Granularity {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(s, &Self::ALL, Self::as_str, "granularity")
    }
}

impl FromStr for HistoryRange {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(s, &Self::ALL, Self::as_str, "duration")
    }
}

impl FromStr for ChartStyle {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option(s, &Self::ALL, Self::as_str, "chart style")
    }
}

impl fmt::Display for ReportingCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_values() {
        assert_eq!("15m".parse::<Granularity>().unwrap(), Granularity::FifteenMinutes);
        assert_eq!("1MO".parse::<HistoryRange>().unwrap(), HistoryRange::OneMonth);
        assert_eq!(" Quarterly ".parse::<ReportingCadence>().unwrap(), ReportingCadence::Quarterly);
        assert_eq!("candlestick".parse::<ChartStyle>().unwrap(), ChartStyle::Candlestick);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "2w".parse::<HistoryRange>().unwrap_err();
        assert!(matches!(err, RadarError::InvalidInput(_)));
    }

    #[test]
    fn test_serde_matches_wire_strings() {
        for g in Granularity::ALL {
            let json = serde_json::to_string(&g).unwrap();
            assert_eq!(json, format!("\"{}\"", g.as_str()));
        }
        for r in HistoryRange::ALL {
            let json = serde_json::to_string(&r).unwrap();
            assert_eq!(json, format!("\"{}\"", r.as_str()));
        }
        assert_eq!(serde_json::to_string(&ReportingCadence::Annual).unwrap(), "\"annual\"");
    }
}
