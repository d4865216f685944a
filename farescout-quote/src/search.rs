use farescout_core::clock::Clock;
use farescout_core::dates;
use farescout_core::validation::{normalize_iata, validate_pattern};
use farescout_core::CoreResult;
use farescout_shared::{CandidateOffer, DatePattern};
use std::sync::Arc;

use crate::adapter::QuoteAdapter;

const SAMPLED_RANGES: usize = 3;
const MAX_DESTINATIONS: usize = 5;
const OFFERS_PER_PAIR: usize = 2;

/// Ad-hoc fare search over a handful of destinations and sampled dates
pub struct FlightSearch {
    adapter: Arc<QuoteAdapter>,
    clock: Arc<dyn Clock>,
}

impl FlightSearch {
    pub fn new(adapter: Arc<QuoteAdapter>, clock: Arc<dyn Clock>) -> Self {
        Self { adapter, clock }
    }

    /// Cheapest offers across destinations and sampled date ranges, merged
    /// and sorted by price. Failing pairs are skipped.
    pub async fn search_flights(
        &self,
        origin: &str,
        destinations: &[String],
        pattern: &DatePattern,
        budget: Option<i32>,
    ) -> CoreResult<Vec<CandidateOffer>> {
        validate_pattern(pattern)?;
        let origin = normalize_iata(origin)?;
        let destinations = destinations
            .iter()
            .take(MAX_DESTINATIONS)
            .map(|code| normalize_iata(code))
            .collect::<CoreResult<Vec<_>>>()?;

        let ranges = dates::sample(pattern, SAMPLED_RANGES, self.clock.today());
        let mut offers = Vec::new();

        for destination in &destinations {
            for range in &ranges {
                match self
                    .adapter
                    .quote(&origin, destination, range.outbound, Some(range.return_date), budget)
                    .await
                {
                    Ok(found) => offers.extend(found.into_iter().take(OFFERS_PER_PAIR)),
                    Err(e) => {
                        tracing::warn!(
                            destination = %destination,
                            outbound = %range.outbound,
                            error = %e,
                            "Skipping flight search pair"
                        );
                    }
                }
            }
        }

        offers.sort_by_key(|offer| offer.price);
        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QuoteCache;
    use crate::mock::MockPriceLookup;
    use crate::normalize::BookingLinks;
    use crate::adapter::QuoteSettings;
    use chrono::{Duration, TimeZone, Utc};
    use farescout_core::clock::ManualClock;

    fn search(lookup: Arc<MockPriceLookup>) -> FlightSearch {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap()));
        let adapter = QuoteAdapter::new(
            lookup,
            QuoteCache::new(Duration::hours(1), clock.clone()),
            BookingLinks::default(),
            QuoteSettings::default(),
        );
        FlightSearch::new(Arc::new(adapter), clock)
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_merges_pairs_and_skips_failures() {
        let lookup = Arc::new(MockPriceLookup::new());
        lookup.set_prices("TBS", vec![300, 120, 180]);
        lookup.set_prices("EVN", vec![150]);
        lookup.fail_destination("GYD");

        let offers = search(lookup.clone())
            .search_flights("cdg", &codes(&["TBS", "GYD", "EVN"]), &DatePattern::weekend(), None)
            .await
            .unwrap();

        // 3 sampled weekends: 2 per TBS pair, 1 per EVN pair
        assert_eq!(offers.len(), 9);
        assert!(offers.windows(2).all(|w| w[0].price <= w[1].price));
        assert!(offers.iter().all(|o| o.price != 300));
        assert_eq!(lookup.calls(), 9);
    }

    #[tokio::test]
    async fn test_only_first_five_destinations() {
        let lookup = Arc::new(MockPriceLookup::new());
        let many = codes(&["TIA", "SKP", "SOF", "KTW", "TLL", "RIX", "CLJ"]);

        search(lookup.clone())
            .search_flights("CDG", &many, &DatePattern::weekend(), Some(200))
            .await
            .unwrap();
        assert_eq!(lookup.calls(), 15);
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_rejected() {
        let lookup = Arc::new(MockPriceLookup::new());
        let pattern = DatePattern::new(farescout_shared::PatternKind::Custom, 0);
        let result = search(lookup)
            .search_flights("CDG", &codes(&["TBS"]), &pattern, None)
            .await;
        assert!(matches!(result, Err(farescout_core::CoreError::Validation(_))));
    }
}
