use farescout_core::geo::{distance_km, estimate_flight_minutes};
use farescout_shared::ScoredDestination;
use serde::{Deserialize, Serialize};

use crate::airports::Airport;
use crate::destination::Catalog;

/// Weights of the composite desirability score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Added when the distance falls strictly inside the sweet spot
    pub sweet_spot_bonus: f64,
    pub sweet_spot_min_km: f64,
    pub sweet_spot_max_km: f64,

    /// Subtracted when the estimated fare exceeds the budget
    pub over_budget_penalty: f64,

    /// Crude fare estimate, currency units per km
    pub price_per_km: f64,

    /// Fare estimate ceiling as a multiple of the budget
    pub budget_cap_ratio: f64,

    pub max_results: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            sweet_spot_bonus: 0.1,
            sweet_spot_min_km: 500.0,
            sweet_spot_max_km: 3000.0,
            over_budget_penalty: 0.3,
            price_per_km: 0.15,
            budget_cap_ratio: 1.5,
            max_results: 20,
        }
    }
}

/// Ranks the catalog against an origin and budget
pub struct DestinationScorer {
    config: ScoringConfig,
}

impl DestinationScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Returns at most `max_results` entries, best first. Entries farther than
    /// `max_distance_km` are dropped before ranking; ties keep catalog order.
    pub fn score(
        &self,
        catalog: &Catalog,
        origin: &Airport,
        budget_max: i32,
        max_distance_km: Option<f64>,
    ) -> Vec<ScoredDestination> {
        let budget = budget_max as f64;

        let mut scored: Vec<ScoredDestination> = catalog
            .destinations()
            .iter()
            .filter_map(|dest| {
                let distance = distance_km(
                    origin.latitude,
                    origin.longitude,
                    dest.latitude,
                    dest.longitude,
                );
                if matches!(max_distance_km, Some(max) if distance > max) {
                    return None;
                }

                Some(ScoredDestination {
                    destination: dest.clone(),
                    distance,
                    flight_duration: estimate_flight_minutes(distance),
                    score: self.composite_score(dest.uniqueness_score, distance, budget),
                })
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.config.max_results);
        scored
    }

    fn composite_score(&self, uniqueness: f64, distance: f64, budget: f64) -> f64 {
        let cfg = &self.config;
        let mut score = uniqueness;

        if distance > cfg.sweet_spot_min_km && distance < cfg.sweet_spot_max_km {
            score += cfg.sweet_spot_bonus;
        }

        let estimated_price = (distance * cfg.price_per_km).min(budget * cfg.budget_cap_ratio);
        if estimated_price > budget {
            score -= cfg.over_budget_penalty;
        }

        score
    }
}

impl Default for DestinationScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::AirportDirectory;
    use proptest::prelude::*;

    fn cdg() -> Airport {
        AirportDirectory::embedded().unwrap().resolve("CDG").unwrap().clone()
    }

    fn codes(scored: &[ScoredDestination]) -> Vec<&str> {
        scored.iter().map(|s| s.destination.iata_code.as_str()).collect()
    }

    #[test]
    fn test_ranking_from_paris() {
        let catalog = Catalog::embedded().unwrap();
        let scored = DestinationScorer::default().score(&catalog, &cdg(), 300, None);

        assert_eq!(scored.len(), 20);
        assert_eq!(&codes(&scored)[..6], &["KIV", "SKP", "PDV", "CLJ", "LWO", "TIA"]);
        assert!((scored[0].score - 1.1).abs() < 1e-9);

        // Equal scores keep catalog order
        assert_eq!(&codes(&scored)[11..16], &["EVN", "TAS", "FRU", "ASU", "NOU"]);
    }

    #[test]
    fn test_over_budget_penalty() {
        let catalog = Catalog::embedded().unwrap();
        let scored = DestinationScorer::default().score(&catalog, &cdg(), 300, None);
        let evn = scored.iter().find(|s| s.destination.iata_code == "EVN").unwrap();
        // 3400 km: no sweet spot bonus, estimate capped at 450 > 300
        assert!((evn.score - 0.7).abs() < 1e-9);
        assert_eq!(evn.flight_duration, estimate_flight_minutes(evn.distance));
    }

    #[test]
    fn test_max_distance_excludes_far_entries() {
        let catalog = Catalog::embedded().unwrap();
        let scored = DestinationScorer::default().score(&catalog, &cdg(), 300, Some(1600.0));
        assert!(!scored.is_empty());
        assert!(scored.iter().all(|s| s.distance <= 1600.0));
        assert!(codes(&scored).contains(&"KTW"));
        assert!(!codes(&scored).contains(&"KIV"));
    }

    proptest! {
        #[test]
        fn prop_scores_capped_and_sorted(budget in 1i32..5000, max in proptest::option::of(100.0f64..20_000.0)) {
            let catalog = Catalog::embedded().unwrap();
            let scored = DestinationScorer::default().score(&catalog, &cdg(), budget, max);
            prop_assert!(scored.len() <= 20);
            for pair in scored.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
            if let Some(max) = max {
                prop_assert!(scored.iter().all(|s| s.distance <= max));
            }
        }
    }
}
