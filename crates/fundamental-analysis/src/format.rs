//! Display formatting for statement amounts, period-over-period changes and
//! ratio metrics.

use serde_json::Value;

/// Literal shown wherever a value is unavailable
pub const NOT_AVAILABLE: &str = "N/A";

/// Accounting-style amount: fractional part truncated, thousands grouped,
/// negatives wrapped in parentheses with no minus sign.
///
/// `-1234.9` renders as `(1,234)`, `1234` as `1,234`.
pub fn format_amount(value: f64) -> String {
    let whole = truncate(value);
    let grouped = group_thousands(whole.unsigned_abs());
    if whole < 0 {
        format!("({})", grouped)
    } else {
        grouped
    }
}

/// Signed whole-percent change, e.g. `+50 %` or `-12 %`.
pub fn format_change(pct: f64) -> String {
    format!("{:+.0} %", pct)
}

/// Percentage change from `previous` to `current`, rounded half-to-even to a
/// whole percent and measured against `|previous|`.
///
/// A zero `previous` yields 0 rather than an undefined ratio; so does any
/// non-finite result.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    let pct = ((current - previous) / previous.abs() * 100.0).round_ties_even();
    if !pct.is_finite() || pct == 0.0 {
        // also folds -0 into 0
        0.0
    } else {
        pct
    }
}

/// Ratio expressed as a whole percent, e.g. `0.2534` -> `25 %`.
pub fn format_ratio_percent(ratio: f64) -> String {
    format!("{:.0} %", ratio * 100.0)
}

/// Integer part of a scalar, e.g. `1.87` -> `1`.
pub fn format_truncated(value: f64) -> String {
    truncate(value).to_string()
}

/// `$` followed by the comma-grouped integer part.
pub fn format_currency(value: f64) -> String {
    let whole = truncate(value);
    let grouped = group_thousands(whole.unsigned_abs());
    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Raw textual form of an attribute value: strings verbatim, numbers as JSON
/// prints them.
pub fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => NOT_AVAILABLE.to_string(),
        other => other.to_string(),
    }
}

fn truncate(value: f64) -> i128 {
    // saturating cast; NaN becomes 0
    value.trunc() as i128
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
