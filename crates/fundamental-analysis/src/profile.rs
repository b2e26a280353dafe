use radar_core::TickerInfo;
use serde::Serialize;

use crate::format::{display_raw, format_currency, NOT_AVAILABLE};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileEntry {
    pub label: &'static str,
    pub display: String,
}

const RAW_FIELDS: [(&str, &str); 9] = [
    ("Name", "longName"),
    ("Symbol", "symbol"),
    ("Sector", "sector"),
    ("Industry", "industry"),
    ("52 Week High", "fiftyTwoWeekHigh"),
    ("52 Week Low", "fiftyTwoWeekLow"),
    ("Dividend Yield", "dividendYield"),
    ("PE Ratio", "trailingPE"),
    ("EPS", "trailingEps"),
];

/// Company overview rows. Market cap follows industry and is shown as a
/// grouped dollar amount; a zero or missing cap is `N/A`.
pub fn extract_profile(info: &TickerInfo) -> Vec<ProfileEntry> {
    let raw = |label: &'static str, key: &str| ProfileEntry {
        label,
        display: info
            .get(key)
            .map(display_raw)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    };

    let mut entries: Vec<ProfileEntry> = RAW_FIELDS[..4].iter().map(|&(l, k)| raw(l, k)).collect();

    entries.push(ProfileEntry {
        label: "Market Cap",
        display: info
            .get_f64("marketCap")
            .filter(|cap| *cap != 0.0)
            .map(format_currency)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    });

    entries.extend(RAW_FIELDS[4..].iter().map(|&(l, k)| raw(l, k)));
    entries
}
