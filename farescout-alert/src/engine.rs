use farescout_core::clock::Clock;
use farescout_core::dates;
use farescout_core::notifier::Notifier;
use farescout_core::repository::{AlertRepository, PriceHistoryRepository, SearchRepository};
use farescout_core::{CoreError, CoreResult};
use farescout_quote::QuoteAdapter;
use farescout_shared::{CandidateOffer, DateRange, NewAlert, NewPriceHistory, Search};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::policy::{AlertPolicy, Decision};

#[derive(Debug, Clone)]
pub struct AlertSettings {
    pub policy: AlertPolicy,
    /// Date ranges sampled per search and tick
    pub sample_size: usize,
    pub dispatch_timeout: Duration,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            policy: AlertPolicy::default(),
            sample_size: 2,
            dispatch_timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome counters of one tick
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickSummary {
    pub searches_checked: usize,
    pub searches_skipped: usize,
    pub searches_failed: usize,
    pub observations: usize,
    pub quote_failures: usize,
    pub alerts_created: usize,
    pub alerts_sent: usize,
    pub dispatch_failures: usize,
}

/// Periodic re-check of saved searches
pub struct AlertEngine {
    searches: Arc<dyn SearchRepository>,
    history: Arc<dyn PriceHistoryRepository>,
    alerts: Arc<dyn AlertRepository>,
    quotes: Arc<QuoteAdapter>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    settings: AlertSettings,
    tick_lock: Mutex<()>,
}

impl AlertEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        searches: Arc<dyn SearchRepository>,
        history: Arc<dyn PriceHistoryRepository>,
        alerts: Arc<dyn AlertRepository>,
        quotes: Arc<QuoteAdapter>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: AlertSettings,
    ) -> Self {
        Self {
            searches,
            history,
            alerts,
            quotes,
            notifier,
            clock,
            settings,
            tick_lock: Mutex::new(()),
        }
    }

    /// Checks every active search once. Only a failure to list searches fails
    /// the tick; everything below is isolated and counted.
    pub async fn run_alert_tick(&self) -> CoreResult<TickSummary> {
        let _guard = self.tick_lock.lock().await;
        let mut summary = TickSummary::default();

        let searches = self.searches.list_active().await?;
        info!(count = searches.len(), "Checking active searches");

        for search in &searches {
            if search.selected_destinations.is_empty() {
                info!(search_id = %search.id, "No destinations to check");
                summary.searches_skipped += 1;
                continue;
            }

            summary.searches_checked += 1;
            if let Err(e) = self.check_search(search, &mut summary).await {
                error!(search_id = %search.id, error = %e, "Failed to check search");
                summary.searches_failed += 1;
            }
        }

        self.quotes.cache().purge_expired();
        info!(?summary, "Alert tick finished");
        Ok(summary)
    }

    async fn check_search(&self, search: &Search, summary: &mut TickSummary) -> CoreResult<()> {
        let ranges = dates::sample(&search.pattern, self.settings.sample_size, self.clock.today());
        let mut failure = None;

        for destination in &search.selected_destinations {
            if let Err(e) = self.check_destination(search, destination, &ranges, summary).await {
                error!(
                    search_id = %search.id,
                    destination = %destination,
                    error = %e,
                    "Failed to process destination"
                );
                failure = Some(e);
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn check_destination(
        &self,
        search: &Search,
        destination: &str,
        ranges: &[DateRange],
        summary: &mut TickSummary,
    ) -> CoreResult<()> {
        let policy = &self.settings.policy;
        let last_price = self
            .history
            .latest(search.id, destination)
            .await?
            .map(|entry| entry.price);

        let mut recently_alerted: Option<bool> = None;
        let mut best: Option<(Decision, CandidateOffer)> = None;

        for range in ranges {
            let offers = match self
                .quotes
                .quote(
                    &search.origin_airport,
                    destination,
                    range.outbound,
                    Some(range.return_date),
                    Some(search.budget),
                )
                .await
            {
                Ok(offers) => offers,
                Err(e) => {
                    warn!(destination = %destination, outbound = %range.outbound, error = %e, "Quote unavailable");
                    summary.quote_failures += 1;
                    continue;
                }
            };

            let Some(cheapest) = offers.into_iter().next() else {
                continue;
            };
            let now = self.clock.now();

            self.history
                .append(NewPriceHistory {
                    search_id: search.id,
                    destination: destination.to_string(),
                    price: cheapest.price,
                    currency: cheapest.currency.clone(),
                    date: range.outbound,
                    recorded_at: now,
                })
                .await?;
            summary.observations += 1;

            if recently_alerted.is_none()
                && policy.needs_dedup_check(last_price, cheapest.price, search.budget)
            {
                let since = now - policy.dedup_window;
                let recent = self.alerts.list_recent(search.id, destination, since).await?;
                recently_alerted = Some(recent.iter().any(|alert| alert.sent));
            }

            let decision = policy.evaluate(
                last_price,
                cheapest.price,
                search.budget,
                recently_alerted.unwrap_or(false),
            );

            if let Some(decision) = decision {
                let cheaper = best
                    .as_ref()
                    .map_or(true, |(_, offer)| cheapest.price < offer.price);
                if cheaper {
                    best = Some((decision, cheapest));
                }
            }
        }

        if let Some((decision, offer)) = best {
            info!(
                search_id = %search.id,
                destination = %destination,
                price = offer.price,
                reason = ?decision.reason,
                price_change = ?decision.price_change,
                "Alert qualified"
            );
            self.raise_alert(search, destination, decision, offer, summary).await?;
        }

        Ok(())
    }

    async fn raise_alert(
        &self,
        search: &Search,
        destination: &str,
        decision: Decision,
        offer: CandidateOffer,
        summary: &mut TickSummary,
    ) -> CoreResult<()> {
        let alert = self
            .alerts
            .create(NewAlert {
                search_id: search.id,
                destination: destination.to_string(),
                current_price: offer.price,
                target_price: self.settings.policy.target_price(search.budget),
                price_change: decision.price_change,
                flight_details: offer.clone(),
                created_at: self.clock.now(),
            })
            .await?;
        summary.alerts_created += 1;

        let send = self.notifier.send_alert(
            search.email.expose(),
            &search.name,
            &offer,
            decision.price_change,
        );
        let delivered = match tokio::time::timeout(self.settings.dispatch_timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::DispatchFailure("send timed out".to_string())),
        };

        match delivered {
            Ok(()) => {
                self.alerts.mark_sent(alert.id).await?;
                summary.alerts_sent += 1;
                info!(
                    alert_id = %alert.id,
                    to = %search.email.redacted(),
                    "Alert sent"
                );
            }
            Err(e) => {
                summary.dispatch_failures += 1;
                warn!(alert_id = %alert.id, error = %e, "Alert dispatch failed");
            }
        }

        Ok(())
    }
}
