use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use farescout_core::validation::validate_new_search;
use farescout_shared::{NewSearch, Search};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/searches", get(list_searches).post(create_search))
        .route("/api/searches/{id}", get(get_search).delete(delete_search))
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::ValidationError(format!("invalid id '{}'", raw)))
}

/// POST /api/searches
///
/// The welcome email is best effort: a delivery failure is logged and the
/// saved search is still returned.
async fn create_search(
    State(state): State<AppState>,
    payload: Result<Json<NewSearch>, JsonRejection>,
) -> Result<Json<Search>, AppError> {
    let Json(mut new) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    validate_new_search(&mut new)?;

    let search = state.searches.create(new, state.clock.now()).await?;
    info!(search_id = %search.id, origin = %search.origin_airport, "Search created");

    if let Err(e) = state.notifier.send_welcome(search.email.expose(), &search.name).await {
        warn!(search_id = %search.id, error = %e, "Welcome email not sent");
    }

    Ok(Json(search))
}

/// GET /api/searches
async fn list_searches(State(state): State<AppState>) -> Result<Json<Vec<Search>>, AppError> {
    Ok(Json(state.searches.list().await?))
}

/// GET /api/searches/{id}
async fn get_search(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Search>, AppError> {
    let id = parse_id(&id)?;
    state
        .searches
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("search {} not found", id)))
}

/// DELETE /api/searches/{id}
async fn delete_search(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if !state.searches.delete(id).await? {
        return Err(AppError::NotFoundError(format!("search {} not found", id)));
    }
    info!(search_id = %id, "Search deleted");
    Ok(Json(json!({ "success": true })))
}
