//! Option API Routes
//!
//! The selectable cadences, granularities, ranges and chart styles, with
//! their defaults.

use axum::{routing::get, Json, Router};
use radar_core::{ChartStyle, Granularity, HistoryRange, ReportingCadence};
use serde::Serialize;

use crate::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct OptionChoice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OptionSet {
    pub default: &'static str,
    pub choices: Vec<OptionChoice>,
}

#[derive(Debug, Serialize)]
pub struct AvailableOptions {
    pub cadences: OptionSet,
    pub granularities: OptionSet,
    pub ranges: OptionSet,
    pub chart_styles: OptionSet,
}

macro_rules! option_set {
    ($ty:ty) => {
        OptionSet {
            default: <$ty>::default().as_str(),
            choices: <$ty>::ALL
                .iter()
                .map(|o| OptionChoice {
                    value: o.as_str(),
                    label: o.label(),
                })
                .collect(),
        }
    };
}

pub fn available_options() -> AvailableOptions {
    AvailableOptions {
        cadences: option_set!(ReportingCadence),
        granularities: option_set!(Granularity),
        ranges: option_set!(HistoryRange),
        chart_styles: option_set!(ChartStyle),
    }
}

pub fn options_routes() -> Router<AppState> {
    Router::new().route("/api/options", get(get_options))
}

async fn get_options() -> Json<ApiResponse<AvailableOptions>> {
    Json(ApiResponse::success(available_options()))
}
