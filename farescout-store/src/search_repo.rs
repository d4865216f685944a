use async_trait::async_trait;
use chrono::{DateTime, Utc};
use farescout_core::repository::SearchRepository;
use farescout_core::CoreResult;
use farescout_shared::{DatePattern, Masked, NewSearch, Search};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store_error;

pub struct PgSearchRepository {
    pool: PgPool,
}

impl PgSearchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SEARCH_COLUMNS: &str = "id, name, origin_airport, budget, pattern, selected_destinations, \
     max_distance, is_active, email, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SearchRow {
    id: Uuid,
    name: String,
    origin_airport: String,
    budget: i32,
    pattern: Json<DatePattern>,
    selected_destinations: Json<Vec<String>>,
    max_distance: Option<i32>,
    is_active: bool,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SearchRow> for Search {
    fn from(row: SearchRow) -> Self {
        Search {
            id: row.id,
            name: row.name,
            origin_airport: row.origin_airport,
            budget: row.budget,
            pattern: row.pattern.0,
            selected_destinations: row.selected_destinations.0,
            max_distance: row.max_distance,
            is_active: row.is_active,
            email: Masked::new(row.email),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SearchRepository for PgSearchRepository {
    async fn create(&self, search: NewSearch, now: DateTime<Utc>) -> CoreResult<Search> {
        let search = Search::from_new(search, now);

        sqlx::query(
            "INSERT INTO searches (id, name, origin_airport, budget, pattern, selected_destinations, max_distance, is_active, email, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(search.id)
        .bind(&search.name)
        .bind(&search.origin_airport)
        .bind(search.budget)
        .bind(Json(&search.pattern))
        .bind(Json(&search.selected_destinations))
        .bind(search.max_distance)
        .bind(search.is_active)
        .bind(search.email.expose())
        .bind(search.created_at)
        .bind(search.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        tracing::info!(search_id = %search.id, email = %search.email.redacted(), "Search saved");
        Ok(search)
    }

    async fn list(&self) -> CoreResult<Vec<Search>> {
        let rows = sqlx::query_as::<_, SearchRow>(&format!(
            "SELECT {} FROM searches ORDER BY created_at DESC",
            SEARCH_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Search::from).collect())
    }

    async fn list_active(&self) -> CoreResult<Vec<Search>> {
        let rows = sqlx::query_as::<_, SearchRow>(&format!(
            "SELECT {} FROM searches WHERE is_active = TRUE ORDER BY created_at DESC",
            SEARCH_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Search::from).collect())
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Search>> {
        let row = sqlx::query_as::<_, SearchRow>(&format!(
            "SELECT {} FROM searches WHERE id = $1",
            SEARCH_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(Search::from))
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        // alerts and price_history go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM searches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }
}
