use async_trait::async_trait;
use chrono::{DateTime, Utc};
use farescout_core::repository::{AlertRepository, PriceHistoryRepository, SearchRepository};
use farescout_core::{CoreError, CoreResult};
use farescout_shared::{Alert, NewAlert, NewPriceHistory, NewSearch, PriceHistoryEntry, Search};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct State {
    searches: Vec<Search>,
    history: Vec<PriceHistoryEntry>,
    alerts: Vec<Alert>,
}

/// Process-local store implementing every repository trait.
///
/// Backs the test suites and `database.url = "memory://"` runs; nothing
/// survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Newest first; among equal timestamps the later insert wins.
fn newest_first<T: Clone>(items: impl DoubleEndedIterator<Item = T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.rev().collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

#[async_trait]
impl SearchRepository for MemoryStore {
    async fn create(&self, search: NewSearch, now: DateTime<Utc>) -> CoreResult<Search> {
        let search = Search::from_new(search, now);
        self.state().searches.push(search.clone());
        tracing::info!(search_id = %search.id, email = %search.email.redacted(), "Search saved");
        Ok(search)
    }

    async fn list(&self) -> CoreResult<Vec<Search>> {
        let state = self.state();
        Ok(newest_first(state.searches.iter().cloned(), |s| s.created_at))
    }

    async fn list_active(&self) -> CoreResult<Vec<Search>> {
        let state = self.state();
        Ok(newest_first(
            state.searches.iter().filter(|s| s.is_active).cloned(),
            |s| s.created_at,
        ))
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Search>> {
        Ok(self.state().searches.iter().find(|s| s.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        let mut state = self.state();
        let before = state.searches.len();
        state.searches.retain(|s| s.id != id);
        if state.searches.len() == before {
            return Ok(false);
        }
        state.alerts.retain(|a| a.search_id != id);
        state.history.retain(|h| h.search_id != id);
        Ok(true)
    }
}

#[async_trait]
impl PriceHistoryRepository for MemoryStore {
    async fn append(&self, entry: NewPriceHistory) -> CoreResult<PriceHistoryEntry> {
        let entry = PriceHistoryEntry::from_new(entry);
        let mut state = self.state();
        if !state.searches.iter().any(|s| s.id == entry.search_id) {
            return Err(CoreError::NotFound(format!("search {}", entry.search_id)));
        }
        state.history.push(entry.clone());
        Ok(entry)
    }

    async fn latest(&self, search_id: Uuid, destination: &str) -> CoreResult<Option<PriceHistoryEntry>> {
        Ok(PriceHistoryRepository::list(self, search_id, destination)
            .await?
            .into_iter()
            .next())
    }

    async fn list(&self, search_id: Uuid, destination: &str) -> CoreResult<Vec<PriceHistoryEntry>> {
        let state = self.state();
        Ok(newest_first(
            state
                .history
                .iter()
                .filter(|h| h.search_id == search_id && h.destination == destination)
                .cloned(),
            |h| h.recorded_at,
        ))
    }
}

#[async_trait]
impl AlertRepository for MemoryStore {
    async fn create(&self, alert: NewAlert) -> CoreResult<Alert> {
        let alert = Alert::from_new(alert);
        let mut state = self.state();
        if !state.searches.iter().any(|s| s.id == alert.search_id) {
            return Err(CoreError::NotFound(format!("search {}", alert.search_id)));
        }
        state.alerts.push(alert.clone());
        Ok(alert)
    }

    async fn list(&self, search_id: Option<Uuid>) -> CoreResult<Vec<Alert>> {
        let state = self.state();
        Ok(newest_first(
            state
                .alerts
                .iter()
                .filter(|a| search_id.map_or(true, |id| a.search_id == id))
                .cloned(),
            |a| a.created_at,
        ))
    }

    async fn list_recent(
        &self,
        search_id: Uuid,
        destination: &str,
        since: DateTime<Utc>,
    ) -> CoreResult<Vec<Alert>> {
        let state = self.state();
        Ok(newest_first(
            state
                .alerts
                .iter()
                .filter(|a| a.search_id == search_id && a.destination == destination && a.created_at >= since)
                .cloned(),
            |a| a.created_at,
        ))
    }

    async fn mark_sent(&self, id: Uuid) -> CoreResult<()> {
        let mut state = self.state();
        match state.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.sent = true;
                Ok(())
            }
            None => Err(CoreError::NotFound(format!("alert {}", id))),
        }
    }
}
