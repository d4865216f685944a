use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::get,
    Json, Router,
};
use farescout_core::validation::validate_new_alert;
use farescout_shared::{Alert, NewAlert};
use serde::Deserialize;

use crate::error::AppError;
use crate::searches::parse_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsQuery {
    pub search_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/alerts", get(list_alerts).post(create_alert))
}

/// POST /api/alerts
async fn create_alert(
    State(state): State<AppState>,
    payload: Result<Json<NewAlert>, JsonRejection>,
) -> Result<Json<Alert>, AppError> {
    let Json(mut new) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    validate_new_alert(&mut new)?;
    Ok(Json(state.alerts.create(new).await?))
}

/// GET /api/alerts
async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let search_id = match query.search_id.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_id(raw)?),
        _ => None,
    };
    Ok(Json(state.alerts.list(search_id).await?))
}
