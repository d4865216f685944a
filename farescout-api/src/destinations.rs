use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use farescout_shared::ScoredDestination;
use serde::Deserialize;

use crate::error::AppError;
use crate::params::{parse_int, required};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationsQuery {
    pub origin: Option<String>,
    pub budget: Option<String>,
    pub max_distance: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/destinations", get(discover_destinations))
}

/// GET /api/destinations
async fn discover_destinations(
    State(state): State<AppState>,
    Query(query): Query<DestinationsQuery>,
) -> Result<Json<Vec<ScoredDestination>>, AppError> {
    let origin = required("origin", &query.origin)?;
    let budget = parse_int("budget", required("budget", &query.budget)?)?;
    // 0 means no limit
    let max_distance = match query.max_distance.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            Some(parse_int("maxDistance", raw)?).filter(|d| *d > 0).map(f64::from)
        }
        _ => None,
    };

    let destinations = state.discovery.discover(origin, budget, max_distance)?;
    tracing::debug!(origin = %origin, budget, count = destinations.len(), "Destinations discovered");
    Ok(Json(destinations))
}
