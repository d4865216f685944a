use chrono::NaiveDate;
use farescout_core::{CoreError, CoreResult};
use farescout_shared::CandidateOffer;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::QuoteCache;
use crate::lookup::{LookupError, PriceLookup, QuoteRequest};
use crate::normalize::{normalize_offer, BookingLinks};

#[derive(Debug, Clone)]
pub struct QuoteSettings {
    pub currency: String,
    /// Offers kept per lookup, cheapest first
    pub max_results: usize,
    pub timeout: Duration,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            max_results: 10,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Cached, normalizing front of a [`PriceLookup`]
pub struct QuoteAdapter {
    lookup: Arc<dyn PriceLookup>,
    cache: QuoteCache,
    links: BookingLinks,
    settings: QuoteSettings,
}

impl QuoteAdapter {
    pub fn new(
        lookup: Arc<dyn PriceLookup>,
        cache: QuoteCache,
        links: BookingLinks,
        settings: QuoteSettings,
    ) -> Self {
        Self {
            lookup,
            cache,
            links,
            settings,
        }
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Offers for one route and date pair, ascending by price.
    ///
    /// Any provider failure, timeout included, surfaces as `QuoteUnavailable`.
    pub async fn quote(
        &self,
        origin: &str,
        destination: &str,
        outbound: NaiveDate,
        return_date: Option<NaiveDate>,
        max_price: Option<i32>,
    ) -> CoreResult<Vec<CandidateOffer>> {
        let request = QuoteRequest {
            origin: origin.to_ascii_uppercase(),
            destination: destination.to_ascii_uppercase(),
            outbound,
            return_date,
            max_price,
        };

        if let Some(offers) = self.cache.get(&request) {
            tracing::debug!(destination = %request.destination, outbound = %outbound, "Quote cache hit");
            return Ok(offers);
        }

        let response = tokio::time::timeout(self.settings.timeout, self.lookup.lookup(&request))
            .await
            .map_err(|_| LookupError::Timeout(self.settings.timeout.as_secs()))
            .and_then(|result| result)
            .map_err(|e| {
                CoreError::QuoteUnavailable(format!(
                    "{}-{} on {}: {}",
                    request.origin, request.destination, outbound, e
                ))
            })?;

        let currency = response
            .currency
            .clone()
            .unwrap_or_else(|| self.settings.currency.clone());

        let mut offers: Vec<CandidateOffer> = response
            .data
            .iter()
            .map(|raw| normalize_offer(raw, &request, &currency, &self.links))
            .filter(|offer| max_price.map_or(true, |max| offer.price <= max))
            .collect();
        offers.sort_by_key(|offer| offer.price);
        offers.truncate(self.settings.max_results);

        self.cache.put(request, offers.clone());
        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPriceLookup;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use farescout_core::clock::ManualClock;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn adapter(lookup: Arc<MockPriceLookup>, clock: Arc<ManualClock>) -> QuoteAdapter {
        QuoteAdapter::new(
            lookup,
            QuoteCache::new(ChronoDuration::hours(1), clock),
            BookingLinks::default(),
            QuoteSettings {
                max_results: 3,
                ..QuoteSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn test_sorted_filtered_and_capped() {
        let lookup = Arc::new(MockPriceLookup::new());
        lookup.set_prices("TBS", vec![320, 150, 210, 90, 180]);
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let adapter = adapter(lookup, clock);

        let offers = adapter.quote("cdg", "tbs", day(7), Some(day(9)), Some(200)).await.unwrap();
        let prices: Vec<i32> = offers.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![90, 150, 180]);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_lookup_until_ttl() {
        let lookup = Arc::new(MockPriceLookup::new());
        lookup.set_prices("TBS", vec![150]);
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
        let adapter = adapter(lookup.clone(), clock.clone());

        adapter.quote("CDG", "TBS", day(7), Some(day(9)), None).await.unwrap();
        adapter.quote("CDG", "TBS", day(7), Some(day(9)), None).await.unwrap();
        assert_eq!(lookup.calls(), 1);

        clock.advance(ChronoDuration::minutes(61));
        adapter.quote("CDG", "TBS", day(7), Some(day(9)), None).await.unwrap();
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_quote_unavailable() {
        let lookup = Arc::new(MockPriceLookup::new());
        lookup.fail_destination("EVN");
        let adapter = adapter(lookup, Arc::new(ManualClock::new(Utc::now())));

        let err = adapter.quote("CDG", "EVN", day(7), Some(day(9)), None).await.unwrap_err();
        assert!(matches!(err, CoreError::QuoteUnavailable(_)));
        assert!(adapter.cache().is_empty());
    }
}
