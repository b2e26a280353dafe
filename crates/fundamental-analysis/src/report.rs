use std::time::Duration;

use radar_core::{with_timeout, MarketDataSource, RadarError, ReportingCadence};
use serde::Serialize;

use crate::kpi::{extract_kpis, KpiEntry};
use crate::profile::{extract_profile, ProfileEntry};
use crate::statement::{normalize_period_set, StatementSet};

/// Everything the research view shows for one ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchReport {
    pub symbol: String,
    pub cadence: ReportingCadence,
    pub profile: Vec<ProfileEntry>,
    pub kpis: Vec<KpiEntry>,
    pub statements: StatementSet,
}

/// Fetches and derives the research report for `symbol`.
///
/// The attribute map is required: if it cannot be fetched the whole report
/// fails. Statements are optional: a failed statement fetch leaves all three
/// sections marked as having no data.
pub async fn build_report(
    source: &dyn MarketDataSource,
    symbol: &str,
    cadence: ReportingCadence,
    fetch_timeout: Duration,
) -> Result<ResearchReport, RadarError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(RadarError::InvalidInput("ticker symbol is empty".to_string()));
    }

    let info = with_timeout(&symbol, fetch_timeout, source.ticker_info(&symbol)).await?;

    let statements = match with_timeout(&symbol, fetch_timeout, source.statements(&symbol, cadence)).await {
        Ok(set) => normalize_period_set(&set),
        Err(e) => {
            tracing::warn!("Statements unavailable for {} ({}): {}", symbol, cadence, e);
            StatementSet::no_data(cadence)
        }
    };

    Ok(ResearchReport {
        profile: extract_profile(&info),
        kpis: extract_kpis(&info),
        statements,
        cadence,
        symbol,
    })
}
