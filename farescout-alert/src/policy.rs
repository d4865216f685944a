use chrono::Duration;

/// Why an observation qualifies for an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertReason {
    FirstObservation,
    PriceDrop,
    GoodDeal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub reason: AlertReason,
    /// Signed percent change against the last recorded price
    pub price_change: Option<i32>,
}

/// Thresholds deciding when a fresh observation is worth an alert
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    /// A change at or below `-drop_threshold_percent` is a drop
    pub drop_threshold_percent: i32,
    /// Prices at or below `budget * deal_ratio` are deals
    pub deal_ratio: f64,
    /// Recorded target price is `floor(budget * target_ratio)`
    pub target_ratio: f64,
    /// A deal is suppressed when an alert for the pair was sent this recently
    pub dedup_window: Duration,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            drop_threshold_percent: 10,
            deal_ratio: 0.8,
            target_ratio: 0.9,
            dedup_window: Duration::hours(24),
        }
    }
}

/// `round((current - last) / last * 100)`, halves rounded up. `None` when `last` is 0.
pub fn price_change_percent(last: i32, current: i32) -> Option<i32> {
    if last == 0 {
        return None;
    }
    let ratio = (current - last) as f64 / last as f64 * 100.0;
    Some((ratio + 0.5).floor() as i32)
}

impl AlertPolicy {
    pub fn target_price(&self, budget: i32) -> i32 {
        (budget as f64 * self.target_ratio).floor() as i32
    }

    pub fn is_drop(&self, price_change: Option<i32>) -> bool {
        matches!(price_change, Some(change) if change <= -self.drop_threshold_percent)
    }

    pub fn is_deal(&self, current: i32, budget: i32) -> bool {
        current as f64 <= budget as f64 * self.deal_ratio
    }

    /// Whether `evaluate` will consult the dedup window for this observation
    pub fn needs_dedup_check(&self, last: Option<i32>, current: i32, budget: i32) -> bool {
        match last {
            None => false,
            Some(last) => {
                !self.is_drop(price_change_percent(last, current)) && self.is_deal(current, budget)
            }
        }
    }

    /// Decides whether an observation qualifies.
    ///
    /// `recently_alerted` is true when an alert for the same pair was created and
    /// sent within the dedup window; only the deal rule looks at it.
    pub fn evaluate(
        &self,
        last: Option<i32>,
        current: i32,
        budget: i32,
        recently_alerted: bool,
    ) -> Option<Decision> {
        let Some(last) = last else {
            return Some(Decision {
                reason: AlertReason::FirstObservation,
                price_change: None,
            });
        };

        let price_change = price_change_percent(last, current);
        if self.is_drop(price_change) {
            return Some(Decision {
                reason: AlertReason::PriceDrop,
                price_change,
            });
        }

        if self.is_deal(current, budget) && !recently_alerted {
            return Some(Decision {
                reason: AlertReason::GoodDeal,
                price_change,
            });
        }

        None
    }
}
