use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use farescout_core::repository::PriceHistoryRepository;
use farescout_core::CoreResult;
use farescout_shared::{NewPriceHistory, PriceHistoryEntry};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store_error;

pub struct PgPriceHistoryRepository {
    pool: PgPool,
}

impl PgPriceHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    search_id: Uuid,
    destination: String,
    price: i32,
    currency: String,
    date: NaiveDate,
    recorded_at: DateTime<Utc>,
}

impl From<HistoryRow> for PriceHistoryEntry {
    fn from(row: HistoryRow) -> Self {
        PriceHistoryEntry {
            id: row.id,
            search_id: row.search_id,
            destination: row.destination,
            price: row.price,
            currency: row.currency,
            date: row.date,
            recorded_at: row.recorded_at,
        }
    }
}

#[async_trait]
impl PriceHistoryRepository for PgPriceHistoryRepository {
    async fn append(&self, entry: NewPriceHistory) -> CoreResult<PriceHistoryEntry> {
        let entry = PriceHistoryEntry::from_new(entry);

        sqlx::query(
            "INSERT INTO price_history (id, search_id, destination, price, currency, date, recorded_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(entry.id)
        .bind(entry.search_id)
        .bind(&entry.destination)
        .bind(entry.price)
        .bind(&entry.currency)
        .bind(entry.date)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(entry)
    }

    async fn latest(&self, search_id: Uuid, destination: &str) -> CoreResult<Option<PriceHistoryEntry>> {
        let row = sqlx::query_as::<_, HistoryRow>(
            "SELECT id, search_id, destination, price, currency, date, recorded_at
             FROM price_history
             WHERE search_id = $1 AND destination = $2
             ORDER BY recorded_at DESC
             LIMIT 1",
        )
        .bind(search_id)
        .bind(destination)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(PriceHistoryEntry::from))
    }

    async fn list(&self, search_id: Uuid, destination: &str) -> CoreResult<Vec<PriceHistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT id, search_id, destination, price, currency, date, recorded_at
             FROM price_history
             WHERE search_id = $1 AND destination = $2
             ORDER BY recorded_at DESC",
        )
        .bind(search_id)
        .bind(destination)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(PriceHistoryEntry::from).collect())
    }
}
