use async_trait::async_trait;
use chrono::{DateTime, Utc};
use farescout_core::repository::AlertRepository;
use farescout_core::{CoreError, CoreResult};
use farescout_shared::{Alert, CandidateOffer, NewAlert};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store_error;

pub struct PgAlertRepository {
    pool: PgPool,
}

impl PgAlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AlertRow {
    id: Uuid,
    search_id: Uuid,
    destination: String,
    current_price: i32,
    target_price: i32,
    price_change: Option<i32>,
    flight_details: Json<CandidateOffer>,
    sent: bool,
    created_at: DateTime<Utc>,
}

impl From<AlertRow> for Alert {
    fn from(row: AlertRow) -> Self {
        Alert {
            id: row.id,
            search_id: row.search_id,
            destination: row.destination,
            current_price: row.current_price,
            target_price: row.target_price,
            price_change: row.price_change,
            flight_details: row.flight_details.0,
            sent: row.sent,
            created_at: row.created_at,
        }
    }
}

const ALERT_COLUMNS: &str = "id, search_id, destination, current_price, target_price, price_change, \
     flight_details, sent, created_at";

#[async_trait]
impl AlertRepository for PgAlertRepository {
    async fn create(&self, alert: NewAlert) -> CoreResult<Alert> {
        let alert = Alert::from_new(alert);

        sqlx::query(
            "INSERT INTO alerts (id, search_id, destination, current_price, target_price, price_change, flight_details, sent, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(alert.id)
        .bind(alert.search_id)
        .bind(&alert.destination)
        .bind(alert.current_price)
        .bind(alert.target_price)
        .bind(alert.price_change)
        .bind(Json(&alert.flight_details))
        .bind(alert.sent)
        .bind(alert.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation()) {
                CoreError::NotFound(format!("search {}", alert.search_id))
            } else {
                store_error(e)
            }
        })?;

        Ok(alert)
    }

    async fn list(&self, search_id: Option<Uuid>) -> CoreResult<Vec<Alert>> {
        let rows = match search_id {
            Some(search_id) => {
                sqlx::query_as::<_, AlertRow>(&format!(
                    "SELECT {} FROM alerts WHERE search_id = $1 ORDER BY created_at DESC",
                    ALERT_COLUMNS
                ))
                .bind(search_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, AlertRow>(&format!(
                    "SELECT {} FROM alerts ORDER BY created_at DESC",
                    ALERT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Alert::from).collect())
    }

    async fn list_recent(
        &self,
        search_id: Uuid,
        destination: &str,
        since: DateTime<Utc>,
    ) -> CoreResult<Vec<Alert>> {
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            "SELECT {} FROM alerts
             WHERE search_id = $1 AND destination = $2 AND created_at >= $3
             ORDER BY created_at DESC",
            ALERT_COLUMNS
        ))
        .bind(search_id)
        .bind(destination)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Alert::from).collect())
    }

    async fn mark_sent(&self, id: Uuid) -> CoreResult<()> {
        let result = sqlx::query("UPDATE alerts SET sent = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("alert {}", id)));
        }
        Ok(())
    }
}
