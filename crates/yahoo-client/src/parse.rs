//! Decoding of Yahoo Finance response bodies into pipeline types. Nothing in
//! here touches the network.

use chrono::{DateTime, NaiveDate};
use radar_core::{
    Bar, LineItem, PeriodSet, PriceSeries, RadarError, RawStatement, ReportingCadence, StatementKind, TickerInfo,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// quoteSummary modules merged into one attribute map; a key repeated by a
/// later module overwrites the earlier value
pub const SUMMARY_MODULES: [&str; 5] = ["price", "summaryDetail", "defaultKeyStatistics", "assetProfile", "financialData"];

const PROFIT_AND_LOSS_ITEMS: &[&str] = &[
    "TotalRevenue",
    "CostOfRevenue",
    "GrossProfit",
    "OperatingExpense",
    "ResearchAndDevelopment",
    "SellingGeneralAndAdministration",
    "OperatingIncome",
    "InterestExpense",
    "PretaxIncome",
    "TaxProvision",
    "NetIncome",
    "EBIT",
    "EBITDA",
    "BasicEPS",
    "DilutedEPS",
];

const BALANCE_SHEET_ITEMS: &[&str] = &[
    "TotalAssets",
    "CurrentAssets",
    "CashAndCashEquivalents",
    "Receivables",
    "Inventory",
    "TotalNonCurrentAssets",
    "TotalLiabilitiesNetMinorityInterest",
    "CurrentLiabilities",
    "LongTermDebt",
    "TotalDebt",
    "StockholdersEquity",
    "RetainedEarnings",
    "WorkingCapital",
];

const CASH_FLOW_ITEMS: &[&str] = &[
    "OperatingCashFlow",
    "InvestingCashFlow",
    "FinancingCashFlow",
    "CapitalExpenditure",
    "FreeCashFlow",
    "RepurchaseOfCapitalStock",
    "CashDividendsPaid",
    "EndCashPosition",
];

/// Time-series keys (without cadence prefix) requested for a statement
pub fn line_items(kind: StatementKind) -> &'static [&'static str] {
    match kind {
        StatementKind::ProfitAndLoss => PROFIT_AND_LOSS_ITEMS,
        StatementKind::BalanceSheet => BALANCE_SHEET_ITEMS,
        StatementKind::CashFlow => CASH_FLOW_ITEMS,
    }
}

/// Every `type` parameter of a fundamentals time-series request, e.g.
/// `annualTotalRevenue`
pub fn timeseries_types(cadence: ReportingCadence) -> Vec<String> {
    StatementKind::ALL
        .iter()
        .flat_map(|&kind| line_items(kind).iter())
        .map(|key| format!("{}{}", cadence.as_str(), key))
        .collect()
}

/// `TotalNonCurrentAssets` -> `Total Non Current Assets`, `DilutedEPS` ->
/// `Diluted EPS`
pub fn humanize_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl YahooError {
    fn into_radar(self, symbol: &str) -> RadarError {
        let reason = match self.description {
            Some(description) if !description.is_empty() => description,
            _ => self.code,
        };
        RadarError::fetch(symbol, reason)
    }
}

/// Yahoo reports unknown symbols inside the body, next to a null result
fn body_error(symbol: &str, section: &Value) -> Option<RadarError> {
    let error = section.get("error").filter(|e| !e.is_null())?;
    Some(match serde_json::from_value::<YahooError>(error.clone()) {
        Ok(error) => error.into_radar(symbol),
        Err(_) => RadarError::fetch(symbol, error.to_string()),
    })
}

// Chart response structures
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn sample(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

/// Decodes a v8 chart body. Samples with any missing price are dropped, a
/// missing volume counts as zero, and out-of-order timestamps are discarded.
pub fn parse_chart(symbol: &str, body: &Value) -> Result<PriceSeries, RadarError> {
    let envelope: ChartEnvelope = serde_json::from_value(body.clone())
        .map_err(|e| RadarError::fetch(symbol, format!("malformed chart response: {}", e)))?;

    if let Some(error) = envelope.chart.error {
        return Err(error.into_radar(symbol));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| RadarError::fetch(symbol, "no chart data"))?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let bars = result
        .timestamp
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            Some(Bar {
                timestamp: DateTime::from_timestamp(ts, 0)?,
                open: sample(&quote.open, i)?,
                high: sample(&quote.high, i)?,
                low: sample(&quote.low, i)?,
                close: sample(&quote.close, i)?,
                volume: sample(&quote.volume, i).unwrap_or(0.0),
            })
        })
        .collect();

    Ok(PriceSeries::from_bars(bars))
}

/// `{"raw": 1.2, "fmt": "1.20"}` -> `1.2`; formatted-only objects, lists and
/// nulls are skipped
fn flatten_value(value: &Value) -> Option<Value> {
    match value {
        Value::Object(fields) => fields.get("raw").filter(|raw| !raw.is_null()).cloned(),
        Value::Array(_) | Value::Null => None,
        other => Some(other.clone()),
    }
}

/// Flattens a v10 quoteSummary body into one attribute map.
pub fn parse_quote_summary(symbol: &str, body: &Value) -> Result<TickerInfo, RadarError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| RadarError::fetch(symbol, "malformed quote summary response"))?;

    if let Some(error) = body_error(symbol, summary) {
        return Err(error);
    }

    let result = summary
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .ok_or_else(|| RadarError::fetch(symbol, "no quote data"))?;

    let mut info = TickerInfo::new();
    for module in SUMMARY_MODULES {
        let Some(fields) = result.get(module).and_then(Value::as_object) else {
            continue;
        };
        for (key, value) in fields {
            if let Some(flat) = flatten_value(value) {
                info.insert(key.clone(), flat);
            }
        }
    }

    // financialData omits currentPrice for funds and indices
    if info.get("currentPrice").is_none() {
        if let Some(price) = info.get("regularMarketPrice").cloned() {
            info.insert("currentPrice", price);
        }
    }

    if info.is_empty() {
        return Err(RadarError::fetch(symbol, "no quote data"));
    }
    Ok(info)
}

fn reported_point(point: &Value) -> Option<(NaiveDate, f64)> {
    let date = NaiveDate::parse_from_str(point.get("asOfDate")?.as_str()?, "%Y-%m-%d").ok()?;
    let value = point.pointer("/reportedValue/raw")?.as_f64()?;
    Some((date, value))
}

fn assemble_statement(keys: &[&str], series: &HashMap<&str, Vec<(NaiveDate, f64)>>) -> Option<RawStatement> {
    let present: Vec<(&str, &Vec<(NaiveDate, f64)>)> = keys
        .iter()
        .filter_map(|key| series.get(key).filter(|points| !points.is_empty()).map(|points| (*key, points)))
        .collect();
    if present.is_empty() {
        return None;
    }

    // newest first
    let periods: Vec<NaiveDate> = present
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(date, _)| *date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect();

    let rows = present
        .iter()
        .map(|(key, points)| {
            let by_date: HashMap<NaiveDate, f64> = points.iter().copied().collect();
            LineItem::new(humanize_key(key), periods.iter().map(|date| by_date.get(date).copied()).collect())
        })
        .collect();

    Some(RawStatement::new(periods, rows))
}

/// Assembles the three statements of one cadence from a fundamentals
/// time-series body. A statement with no reported values is left unset.
pub fn parse_timeseries(symbol: &str, body: &Value, cadence: ReportingCadence) -> Result<PeriodSet, RadarError> {
    let timeseries = body
        .get("timeseries")
        .ok_or_else(|| RadarError::fetch(symbol, "malformed time-series response"))?;

    if let Some(error) = body_error(symbol, timeseries) {
        return Err(error);
    }

    let prefix = cadence.as_str();
    let mut series: HashMap<&str, Vec<(NaiveDate, f64)>> = HashMap::new();
    let results = timeseries
        .get("result")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for entry in results {
        let Some(type_name) = entry.pointer("/meta/type/0").and_then(Value::as_str) else {
            continue;
        };
        let Some(key) = type_name.strip_prefix(prefix) else {
            continue;
        };
        let points = entry
            .get(type_name)
            .and_then(Value::as_array)
            .map(|points| points.iter().filter_map(reported_point).collect())
            .unwrap_or_default();
        series.insert(key, points);
    }

    let mut set = PeriodSet::empty(cadence);
    for kind in StatementKind::ALL {
        if let Some(statement) = assemble_statement(line_items(kind), &series) {
            set.set(kind, statement);
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_chart_drops_null_and_stale_samples() {
        let body = json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL"},
                    "timestamp": [1700000000, 1700086400, 1700172800, 1700172800, 1700259200],
                    "indicators": {"quote": [{
                        "open":   [189.0, null,  190.0, 190.5, 191.0],
                        "high":   [190.0, 191.0, 192.0, 192.5, 193.0],
                        "low":    [188.0, 189.0, 189.5, 190.0, 190.5],
                        "close":  [189.5, 190.5, 191.5, 192.0, 192.5],
                        "volume": [1000,  2000,  null,  4000,  5000]
                    }]}
                }],
                "error": null
            }
        });

        let series = parse_chart("AAPL", &body).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![189.5, 191.5, 192.5]);
        assert_eq!(series.bars()[1].volume, 0.0);
        assert!(series.timestamps().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parse_chart_error_body() {
        let body = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        });

        let err = parse_chart("ZZZZ", &body).unwrap_err();
        assert_eq!(err, RadarError::fetch("ZZZZ", "No data found, symbol may be delisted"));
    }

    #[test]
    fn test_parse_chart_without_samples_is_empty() {
        let body = json!({"chart": {"result": [{"meta": {}, "indicators": {"quote": [{}]}}], "error": null}});
        assert!(parse_chart("AAPL", &body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_quote_summary_flattens_modules() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "price": {
                        "symbol": "AAPL",
                        "shortName": "Apple Inc.",
                        "longName": "Apple Inc.",
                        "regularMarketPrice": {"raw": 189.95, "fmt": "189.95"},
                        "marketCap": {"raw": 2950000000000_i64, "fmt": "2.95T", "longFmt": "2,950,000,000,000"}
                    },
                    "summaryDetail": {
                        "previousClose": {"raw": 188.0, "fmt": "188.00"},
                        "dayLow": {"raw": 187.5, "fmt": "187.50"},
                        "dividendYield": {},
                        "trailingPE": {"raw": 30.9, "fmt": "30.90"}
                    },
                    "assetProfile": {
                        "sector": "Technology",
                        "companyOfficers": [{"name": "Tim Cook"}]
                    },
                    "financialData": {
                        "returnOnEquity": {"raw": 1.47, "fmt": "147.25%"},
                        "targetMeanPrice": {"raw": 200.5, "fmt": "200.50"}
                    }
                }],
                "error": null
            }
        });

        let info = parse_quote_summary("AAPL", &body).unwrap();
        assert_eq!(info.get_str("shortName"), Some("Apple Inc."));
        assert_eq!(info.get_str("sector"), Some("Technology"));
        assert_eq!(info.get_f64("previousClose"), Some(188.0));
        assert_eq!(info.get_f64("marketCap"), Some(2_950_000_000_000.0));
        assert_eq!(info.get_f64("returnOnEquity"), Some(1.47));
        assert_eq!(info.get_f64("currentPrice"), Some(189.95));
        assert!(info.get("dividendYield").is_none());
        assert!(info.get("companyOfficers").is_none());
    }

    #[test]
    fn test_parse_quote_summary_not_found() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found for symbol: ZZZZ"}
            }
        });

        let err = parse_quote_summary("ZZZZ", &body).unwrap_err();
        assert_eq!(err, RadarError::fetch("ZZZZ", "Quote not found for symbol: ZZZZ"));
    }

    #[test]
    fn test_parse_timeseries_assembles_newest_first() {
        let body = json!({
            "timeseries": {
                "result": [
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["annualTotalRevenue"]},
                        "timestamp": [1632960000, 1664496000, 1695945600],
                        "annualTotalRevenue": [
                            {"asOfDate": "2021-09-30", "reportedValue": {"raw": 365817000000.0, "fmt": "365.82B"}},
                            {"asOfDate": "2022-09-30", "reportedValue": {"raw": 394328000000.0, "fmt": "394.33B"}},
                            {"asOfDate": "2023-09-30", "reportedValue": {"raw": 383285000000.0, "fmt": "383.29B"}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["annualNetIncome"]},
                        "annualNetIncome": [
                            null,
                            {"asOfDate": "2023-09-30", "reportedValue": {"raw": 96995000000.0, "fmt": "97.00B"}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["annualFreeCashFlow"]},
                        "annualFreeCashFlow": [
                            {"asOfDate": "2023-09-30", "reportedValue": {"raw": 99584000000.0, "fmt": "99.58B"}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["quarterlyTotalRevenue"]},
                        "quarterlyTotalRevenue": [
                            {"asOfDate": "2023-12-31", "reportedValue": {"raw": 119575000000.0, "fmt": "119.58B"}}
                        ]
                    }
                ],
                "error": null
            }
        });

        let set = parse_timeseries("AAPL", &body, ReportingCadence::Annual).unwrap();

        let pnl = set.get(StatementKind::ProfitAndLoss).unwrap();
        assert_eq!(pnl.periods, vec![date(2023, 9, 30), date(2022, 9, 30), date(2021, 9, 30)]);
        let labels: Vec<&str> = pnl.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Total Revenue", "Net Income"]);
        assert_eq!(pnl.rows[0].values, vec![Some(383285000000.0), Some(394328000000.0), Some(365817000000.0)]);
        assert_eq!(pnl.rows[1].values, vec![Some(96995000000.0), None, None]);

        assert!(set.get(StatementKind::BalanceSheet).is_none());
        assert_eq!(set.get(StatementKind::CashFlow).unwrap().period_count(), 1);
    }

    #[test]
    fn test_timeseries_types_carry_cadence_prefix() {
        let types = timeseries_types(ReportingCadence::Quarterly);
        assert!(types.contains(&"quarterlyTotalRevenue".to_string()));
        assert!(types.contains(&"quarterlyFreeCashFlow".to_string()));
        assert!(types.iter().all(|t| t.starts_with("quarterly")));
        assert_eq!(
            types.len(),
            PROFIT_AND_LOSS_ITEMS.len() + BALANCE_SHEET_ITEMS.len() + CASH_FLOW_ITEMS.len()
        );
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("TotalRevenue"), "Total Revenue");
        assert_eq!(humanize_key("DilutedEPS"), "Diluted EPS");
        assert_eq!(humanize_key("EBITDA"), "EBITDA");
        assert_eq!(humanize_key("TotalNonCurrentAssets"), "Total Non Current Assets");
    }
}
