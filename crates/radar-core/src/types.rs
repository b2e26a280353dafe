use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::ReportingCadence;

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Price history with strictly increasing timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Builds a series from bars in delivery order. Any bar whose timestamp
    /// does not advance past the previous kept bar is discarded.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let mut kept: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match kept.last() {
                Some(prev) if bar.timestamp <= prev.timestamp => continue,
                _ => kept.push(bar),
            }
        }
        Self { bars: kept }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// The three statements a company reports each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    ProfitAndLoss,
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::ProfitAndLoss,
        StatementKind::BalanceSheet,
        StatementKind::CashFlow,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::ProfitAndLoss => "Profit & Loss",
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::CashFlow => "Cash Flow",
        }
    }
}

/// One line item of a statement, values aligned with the statement's periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl LineItem {
    pub fn new(label: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// A statement matrix as delivered by the source: line items by period-end
/// date, periods newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStatement {
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<LineItem>,
}

impl RawStatement {
    pub fn new(periods: Vec<NaiveDate>, rows: Vec<LineItem>) -> Self {
        Self { periods, rows }
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.rows.is_empty()
    }

    /// Cell value for arithmetic: absent or non-finite cells count as zero.
    pub fn value(&self, row: usize, period: usize) -> f64 {
        self.rows
            .get(row)
            .and_then(|item| item.values.get(period).copied().flatten())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// The statements of one reporting cadence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSet {
    pub cadence: ReportingCadence,
    pub profit_and_loss: Option<RawStatement>,
    pub balance_sheet: Option<RawStatement>,
    pub cash_flow: Option<RawStatement>,
}

impl PeriodSet {
    pub fn empty(cadence: ReportingCadence) -> Self {
        Self {
            cadence,
            ..Default::default()
        }
    }

    pub fn get(&self, kind: StatementKind) -> Option<&RawStatement> {
        match kind {
            StatementKind::ProfitAndLoss => self.profit_and_loss.as_ref(),
            StatementKind::BalanceSheet => self.balance_sheet.as_ref(),
            StatementKind::CashFlow => self.cash_flow.as_ref(),
        }
    }

    pub fn set(&mut self, kind: StatementKind, statement: RawStatement) {
        let slot = match kind {
            StatementKind::ProfitAndLoss => &mut self.profit_and_loss,
            StatementKind::BalanceSheet => &mut self.balance_sheet,
            StatementKind::CashFlow => &mut self.cash_flow,
        };
        *slot = Some(statement);
    }
}

/// Free-form attribute map for a ticker (prices, ranges, ratios, targets).
/// Keys may be absent and values may be of any JSON type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerInfo(HashMap<String, Value>);

impl TickerInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Numeric value for `key`; absent, null and non-numeric values are `None`.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TickerInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Semantic colour class attached to a value for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    /// Sign of a value: above zero is positive, below is negative, zero or
    /// NaN is neutral.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Tone::Positive
        } else if value < 0.0 {
            Tone::Negative
        } else {
            Tone::Neutral
        }
    }
}
