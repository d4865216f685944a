use chrono::{DateTime, Duration, Utc};
use farescout_core::clock::Clock;
use farescout_shared::CandidateOffer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::lookup::QuoteRequest;

struct CacheEntry {
    offers: Vec<CandidateOffer>,
    stored_at: DateTime<Utc>,
}

/// Time-bounded memo of normalized lookups, keyed by the exact request
pub struct QuoteCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<QuoteRequest, CacheEntry>>,
}

impl QuoteCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached offers, if stored less than `ttl` ago
    pub fn get(&self, request: &QuoteRequest) -> Option<Vec<CandidateOffer>> {
        let now = self.clock.now();
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(request)
            .filter(|entry| now - entry.stored_at < self.ttl)
            .map(|entry| entry.offers.clone())
    }

    /// Last write wins
    pub fn put(&self, request: QuoteRequest, offers: Vec<CandidateOffer>) {
        let entry = CacheEntry {
            offers,
            stored_at: self.clock.now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(request, entry);
    }

    /// Drops expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let initial_count = entries.len();
        entries.retain(|_, entry| now - entry.stored_at < self.ttl);
        initial_count - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
