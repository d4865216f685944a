use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use farescout_core::dates::school_holidays;
use farescout_shared::DateRange;
use serde::Deserialize;

use crate::error::AppError;
use crate::params::parse_int;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HolidaysQuery {
    pub year: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/holidays", get(list_holidays))
}

/// GET /api/holidays, defaulting to the current year
async fn list_holidays(
    State(state): State<AppState>,
    Query(query): Query<HolidaysQuery>,
) -> Result<Json<Vec<DateRange>>, AppError> {
    let year = match query.year.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_int("year", raw)?,
        _ => state.clock.today().year(),
    };
    Ok(Json(school_holidays(year)))
}
