use async_trait::async_trait;
use chrono::{DateTime, Utc};
use farescout_shared::{Alert, NewAlert, NewPriceHistory, NewSearch, PriceHistoryEntry, Search};
use uuid::Uuid;

use crate::CoreResult;

/// Repository trait for saved searches
#[async_trait]
pub trait SearchRepository: Send + Sync {
    async fn create(&self, search: NewSearch, now: DateTime<Utc>) -> CoreResult<Search>;

    /// All searches, newest first
    async fn list(&self) -> CoreResult<Vec<Search>>;

    async fn list_active(&self) -> CoreResult<Vec<Search>>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<Search>>;

    /// Deletes the search together with its alerts and price history.
    /// Returns false when no such search exists.
    async fn delete(&self, id: Uuid) -> CoreResult<bool>;
}

/// Append-only price observations
#[async_trait]
pub trait PriceHistoryRepository: Send + Sync {
    async fn append(&self, entry: NewPriceHistory) -> CoreResult<PriceHistoryEntry>;

    /// Most recently recorded observation for the pair
    async fn latest(&self, search_id: Uuid, destination: &str) -> CoreResult<Option<PriceHistoryEntry>>;

    /// Observations for the pair, newest first
    async fn list(&self, search_id: Uuid, destination: &str) -> CoreResult<Vec<PriceHistoryEntry>>;
}

/// Repository trait for alerts
#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn create(&self, alert: NewAlert) -> CoreResult<Alert>;

    /// Alerts, newest first, optionally restricted to one search
    async fn list(&self, search_id: Option<Uuid>) -> CoreResult<Vec<Alert>>;

    /// Alerts for the pair created at or after `since`
    async fn list_recent(
        &self,
        search_id: Uuid,
        destination: &str,
        since: DateTime<Utc>,
    ) -> CoreResult<Vec<Alert>>;

    async fn mark_sent(&self, id: Uuid) -> CoreResult<()>;
}
