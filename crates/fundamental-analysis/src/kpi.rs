use radar_core::TickerInfo;
use serde::Serialize;

use crate::format::{format_ratio_percent, format_truncated, NOT_AVAILABLE};

/// How a KPI's source value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiUnit {
    /// Fraction shown as a whole percent
    Ratio,
    /// Plain number shown as its integer part
    Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiMetric {
    ReturnOnEquity,
    DebtToEquity,
    CurrentRatio,
    GrossMargins,
    OperatingMargins,
    ProfitMargins,
    EbitdaMargins,
    QuickRatio,
    PayoutRatio,
    Beta,
}

impl KpiMetric {
    /// Display order of the KPI table
    pub const ALL: [KpiMetric; 10] = [
        KpiMetric::ReturnOnEquity,
        KpiMetric::DebtToEquity,
        KpiMetric::CurrentRatio,
        KpiMetric::GrossMargins,
        KpiMetric::OperatingMargins,
        KpiMetric::ProfitMargins,
        KpiMetric::EbitdaMargins,
        KpiMetric::QuickRatio,
        KpiMetric::PayoutRatio,
        KpiMetric::Beta,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            KpiMetric::ReturnOnEquity => "Return on Equity",
            KpiMetric::DebtToEquity => "Debt to Equity",
            KpiMetric::CurrentRatio => "Current Ratio",
            KpiMetric::GrossMargins => "Gross Margins",
            KpiMetric::OperatingMargins => "Operating Margins",
            KpiMetric::ProfitMargins => "Profit Margins",
            KpiMetric::EbitdaMargins => "EBITDA Margins",
            KpiMetric::QuickRatio => "Quick Ratio",
            KpiMetric::PayoutRatio => "Payout Ratio",
            KpiMetric::Beta => "Beta",
        }
    }

    /// Attribute-map key the value is read from
    pub fn source_key(&self) -> &'static str {
        match self {
            KpiMetric::ReturnOnEquity => "returnOnEquity",
            KpiMetric::DebtToEquity => "debtToEquity",
            KpiMetric::CurrentRatio => "currentRatio",
            KpiMetric::GrossMargins => "grossMargins",
            KpiMetric::OperatingMargins => "operatingMargins",
            KpiMetric::ProfitMargins => "profitMargins",
            KpiMetric::EbitdaMargins => "ebitdaMargins",
            KpiMetric::QuickRatio => "quickRatio",
            KpiMetric::PayoutRatio => "payoutRatio",
            KpiMetric::Beta => "beta",
        }
    }

    pub fn unit(&self) -> KpiUnit {
        match self {
            KpiMetric::DebtToEquity | KpiMetric::CurrentRatio | KpiMetric::QuickRatio | KpiMetric::Beta => {
                KpiUnit::Scalar
            }
            _ => KpiUnit::Ratio,
        }
    }

    fn render(&self, value: f64) -> String {
        match self.unit() {
            KpiUnit::Ratio => format_ratio_percent(value),
            KpiUnit::Scalar => format_truncated(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiEntry {
    pub metric: KpiMetric,
    pub name: &'static str,
    pub unit: KpiUnit,
    /// Source value as read from the attribute map
    pub value: Option<f64>,
    pub display: String,
}

impl KpiEntry {
    pub fn is_available(&self) -> bool {
        self.value.is_some()
    }
}

/// Extracts the fixed KPI table from a ticker's attribute map.
///
/// Always returns every metric of [`KpiMetric::ALL`] in order. A metric whose
/// value is absent or not a number shows `N/A`.
pub fn extract_kpis(info: &TickerInfo) -> Vec<KpiEntry> {
    KpiMetric::ALL
        .iter()
        .map(|&metric| {
            let value = info.get_f64(metric.source_key());
            KpiEntry {
                metric,
                name: metric.label(),
                unit: metric.unit(),
                value,
                display: value
                    .map(|v| metric.render(v))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            }
        })
        .collect()
}
