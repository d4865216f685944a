use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use farescout_shared::{CandidateOffer, DatePattern};
use serde::Deserialize;

use crate::error::AppError;
use crate::params::{parse_int, required};
use crate::state::AppState;

/// `destinations` is a JSON array of IATA codes and `pattern` a JSON object
#[derive(Debug, Deserialize)]
pub struct FlightsQuery {
    pub origin: Option<String>,
    pub destinations: Option<String>,
    pub pattern: Option<String>,
    pub budget: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/flights", get(search_flights))
}

/// GET /api/flights
async fn search_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightsQuery>,
) -> Result<Json<Vec<CandidateOffer>>, AppError> {
    let origin = required("origin", &query.origin)?;
    let destinations: Vec<String> = serde_json::from_str(required("destinations", &query.destinations)?)
        .map_err(|e| AppError::ValidationError(format!("destinations: {}", e)))?;
    let pattern: DatePattern = serde_json::from_str(required("pattern", &query.pattern)?)
        .map_err(|e| AppError::ValidationError(format!("pattern: {}", e)))?;
    let budget = match query.budget.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(parse_int("budget", raw)?),
        _ => None,
    };

    let offers = state
        .flights
        .search_flights(origin, &destinations, &pattern, budget)
        .await?;
    Ok(Json(offers))
}
