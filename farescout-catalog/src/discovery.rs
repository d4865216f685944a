use farescout_core::{CoreError, CoreResult};
use farescout_shared::ScoredDestination;
use std::sync::Arc;

use crate::airports::AirportDirectory;
use crate::destination::Catalog;
use crate::scoring::DestinationScorer;

/// Destination discovery entry point
pub struct Discovery {
    catalog: Arc<Catalog>,
    airports: AirportDirectory,
    scorer: DestinationScorer,
}

impl Discovery {
    pub fn new(catalog: Arc<Catalog>, airports: AirportDirectory, scorer: DestinationScorer) -> Self {
        Self {
            catalog,
            airports,
            scorer,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Scores the catalog for a trip from `origin_code` within `budget`
    pub fn discover(
        &self,
        origin_code: &str,
        budget: i32,
        max_distance: Option<f64>,
    ) -> CoreResult<Vec<ScoredDestination>> {
        let code = origin_code.trim().to_ascii_uppercase();
        if budget <= 0 {
            return Err(CoreError::Validation("budget must be positive".to_string()));
        }

        let origin = self
            .airports
            .resolve(&code)
            .ok_or_else(|| CoreError::Validation(format!("unknown origin airport '{}'", code)))?;

        let scored = self.scorer.score(&self.catalog, origin, budget, max_distance);
        tracing::debug!(origin = %code, budget, results = scored.len(), "Destinations scored");
        Ok(scored)
    }
}
