//! Statement normalization: turns a raw statement matrix into a display
//! matrix with a change column after every period that has a predecessor.

use chrono::NaiveDate;
use radar_core::{PeriodSet, RawStatement, ReportingCadence, StatementKind, Tone};
use serde::Serialize;

use crate::format::{format_amount, format_change, percent_change};

/// Column of a display statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayColumn {
    Period { date: NaiveDate },
    Change { current: NaiveDate, previous: NaiveDate },
}

impl DisplayColumn {
    pub fn header(&self) -> String {
        match self {
            DisplayColumn::Period { date } => date.to_string(),
            DisplayColumn::Change { current, .. } => format!("{}-%", current),
        }
    }
}

/// One formatted cell. The numeric value travels with its text so callers
/// can test and sort without parsing display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayCell {
    Amount { value: f64, text: String },
    Change { pct: f64, text: String, tone: Tone },
}

impl DisplayCell {
    fn amount(value: f64) -> Self {
        DisplayCell::Amount {
            value,
            text: format_amount(value),
        }
    }

    fn change(current: f64, previous: f64) -> Self {
        let pct = percent_change(current, previous);
        DisplayCell::Change {
            pct,
            text: format_change(pct),
            tone: Tone::of(pct),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DisplayCell::Amount { text, .. } | DisplayCell::Change { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub label: String,
    pub cells: Vec<DisplayCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayStatement {
    pub columns: Vec<DisplayColumn>,
    pub rows: Vec<DisplayRow>,
}

impl DisplayStatement {
    /// Period columns plus change columns: `2n - 1` for `n` periods
    pub fn value_column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(DisplayColumn::header).collect()
    }
}

/// Result of normalizing one statement: a table, or an explicit marker that
/// the source had nothing to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalizedStatement {
    Table(DisplayStatement),
    NoData,
}

impl NormalizedStatement {
    pub fn table(&self) -> Option<&DisplayStatement> {
        match self {
            NormalizedStatement::Table(table) => Some(table),
            NormalizedStatement::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, NormalizedStatement::NoData)
    }
}

/// Normalizes a raw statement whose periods arrive newest first.
///
/// Missing cells count as zero. Each period is followed by its change versus
/// the next (older) period, so `n` periods give `2n - 1` value columns. Line
/// items come back in reverse of their input order. An absent statement, or
/// one with no periods or no line items, gives [`NormalizedStatement::NoData`].
pub fn normalize_statement(raw: Option<&RawStatement>) -> NormalizedStatement {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return NormalizedStatement::NoData,
    };

    let n = raw.period_count();
    let mut columns = Vec::with_capacity(2 * n - 1);
    for (j, date) in raw.periods.iter().enumerate() {
        columns.push(DisplayColumn::Period { date: *date });
        if let Some(previous) = raw.periods.get(j + 1) {
            columns.push(DisplayColumn::Change {
                current: *date,
                previous: *previous,
            });
        }
    }

    let mut rows: Vec<DisplayRow> = raw
        .rows
        .iter()
        .enumerate()
        .map(|(r, item)| {
            let mut cells = Vec::with_capacity(columns.len());
            for j in 0..n {
                let current = raw.value(r, j);
                cells.push(DisplayCell::amount(current));
                if j + 1 < n {
                    cells.push(DisplayCell::change(current, raw.value(r, j + 1)));
                }
            }
            DisplayRow {
                label: item.label.clone(),
                cells,
            }
        })
        .collect();
    rows.reverse();

    NormalizedStatement::Table(DisplayStatement { columns, rows })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementSection {
    pub kind: StatementKind,
    pub title: &'static str,
    pub statement: NormalizedStatement,
}

/// The three normalized statements of one cadence, in P&L, balance sheet,
/// cash flow order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementSet {
    pub cadence: ReportingCadence,
    pub sections: Vec<StatementSection>,
}

impl StatementSet {
    /// Every section marked as having no data
    pub fn no_data(cadence: ReportingCadence) -> Self {
        normalize_period_set(&PeriodSet::empty(cadence))
    }

    pub fn get(&self, kind: StatementKind) -> Option<&NormalizedStatement> {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| &s.statement)
    }
}

pub fn normalize_period_set(set: &PeriodSet) -> StatementSet {
    let sections = StatementKind::ALL
        .iter()
        .map(|&kind| StatementSection {
            kind,
            title: kind.label(),
            statement: normalize_statement(set.get(kind)),
        })
        .collect();

    StatementSet {
        cadence: set.cadence,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_core::LineItem;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn income_statement() -> RawStatement {
        RawStatement::new(
            vec![date(2024, 9, 30), date(2023, 9, 30), date(2022, 9, 30)],
            vec![
                LineItem::new("Total Revenue", vec![Some(150.0), Some(100.0), Some(0.0)]),
                LineItem::new("Net Income", vec![Some(-1234.0), Some(-2468.0), None]),
                LineItem::new("Tax Provision", vec![Some(50.0), None, Some(25.0)]),
            ],
        )
    }

    fn texts(row: &DisplayRow) -> Vec<&str> {
        row.cells.iter().map(DisplayCell::text).collect()
    }

    #[test]
    fn test_column_layout() {
        let result = normalize_statement(Some(&income_statement()));
        let table = result.table().expect("table");

        assert_eq!(table.value_column_count(), 5);
        assert_eq!(
            table.headers(),
            vec!["2024-09-30", "2024-09-30-%", "2023-09-30", "2023-09-30-%", "2022-09-30"]
        );
        assert!(table.rows.iter().all(|r| r.cells.len() == 5));
    }

    #[test]
    fn test_rows_are_reversed() {
        let result = normalize_statement(Some(&income_statement()));
        let labels: Vec<&str> = result.table().unwrap().rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Tax Provision", "Net Income", "Total Revenue"]);
    }

    #[test]
    fn test_cells_and_changes() {
        let result = normalize_statement(Some(&income_statement()));
        let rows = &result.table().unwrap().rows;

        // Total Revenue: 150 vs 100 => +50 %, 100 vs 0 => defined 0 %
        assert_eq!(texts(&rows[2]), vec!["150", "+50 %", "100", "+0 %", "0"]);
        // Net Income: -1234 vs -2468 => +50 % of magnitude; missing oldest is zero
        assert_eq!(texts(&rows[1]), vec!["(1,234)", "+50 %", "(2,468)", "+0 %", "0"]);
        // Tax Provision: 50 vs missing (zero) => 0 %, missing vs 25 => -100 %
        assert_eq!(texts(&rows[0]), vec!["50", "+0 %", "0", "-100 %", "25"]);
    }

    #[test]
    fn test_change_cells_carry_value_and_tone() {
        let raw = RawStatement::new(
            vec![date(2024, 12, 31), date(2023, 12, 31)],
            vec![
                LineItem::new("Up", vec![Some(150.0), Some(100.0)]),
                LineItem::new("Down", vec![Some(50.0), Some(100.0)]),
                LineItem::new("Flat", vec![Some(7.0), Some(0.0)]),
            ],
        );
        let result = normalize_statement(Some(&raw));
        let rows = &result.table().unwrap().rows;

        let change_of = |row: &DisplayRow| match &row.cells[1] {
            DisplayCell::Change { pct, tone, .. } => (*pct, *tone),
            other => panic!("expected change cell, got {:?}", other),
        };
        assert_eq!(change_of(&rows[2]), (50.0, Tone::Positive));
        assert_eq!(change_of(&rows[1]), (-50.0, Tone::Negative));
        assert_eq!(change_of(&rows[0]), (0.0, Tone::Neutral));
    }

    #[test]
    fn test_single_period_has_no_change_columns() {
        let raw = RawStatement::new(
            vec![date(2024, 12, 31)],
            vec![LineItem::new("Cash", vec![Some(-10.5)])],
        );
        let result = normalize_statement(Some(&raw));
        let table = result.table().unwrap();

        assert_eq!(table.value_column_count(), 1);
        assert_eq!(texts(&table.rows[0]), vec!["(10)"]);
    }

    #[test]
    fn test_absent_or_empty_statement_is_no_data() {
        assert!(normalize_statement(None).is_no_data());
        assert!(normalize_statement(Some(&RawStatement::default())).is_no_data());

        let no_rows = RawStatement::new(vec![date(2024, 12, 31)], vec![]);
        assert!(normalize_statement(Some(&no_rows)).is_no_data());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = income_statement();
        assert_eq!(normalize_statement(Some(&raw)), normalize_statement(Some(&raw)));
    }

    #[test]
    fn test_normalize_period_set() {
        let mut set = PeriodSet::empty(ReportingCadence::Quarterly);
        set.set(StatementKind::ProfitAndLoss, income_statement());

        let normalized = normalize_period_set(&set);
        assert_eq!(normalized.cadence, ReportingCadence::Quarterly);
        let kinds: Vec<StatementKind> = normalized.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, StatementKind::ALL.to_vec());
        assert!(normalized.get(StatementKind::ProfitAndLoss).unwrap().table().is_some());
        assert!(normalized.get(StatementKind::BalanceSheet).unwrap().is_no_data());
        assert!(normalized.get(StatementKind::CashFlow).unwrap().is_no_data());
    }

    #[test]
    fn test_serialized_shape() {
        let raw = RawStatement::new(
            vec![date(2024, 12, 31), date(2023, 12, 31)],
            vec![LineItem::new("Revenue", vec![Some(150.0), Some(100.0)])],
        );
        let json = serde_json::to_value(normalize_statement(Some(&raw))).unwrap();

        assert_eq!(json["status"], "table");
        assert_eq!(json["rows"][0]["cells"][1]["kind"], "change");
        assert_eq!(json["rows"][0]["cells"][1]["tone"], "positive");
        assert_eq!(json["rows"][0]["cells"][1]["pct"], 50.0);

        let empty = serde_json::to_value(NormalizedStatement::NoData).unwrap();
        assert_eq!(empty["status"], "no_data");
    }
}
