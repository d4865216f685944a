use farescout_alert::TickSummary;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Alert-loop counters exposed at `/metrics`
pub struct Metrics {
    registry: Registry,
    pub ticks: IntCounter,
    pub searches_checked: IntCounter,
    pub searches_failed: IntCounter,
    pub observations: IntCounter,
    pub quote_failures: IntCounter,
    pub alerts_created: IntCounter,
    pub alerts_sent: IntCounter,
    pub dispatch_failures: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let counter = IntCounter::new(name, help)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        Ok(Self {
            ticks: counter(&registry, "farescout_alert_ticks_total", "Completed alert ticks")?,
            searches_checked: counter(
                &registry,
                "farescout_searches_checked_total",
                "Saved searches checked by the alert loop",
            )?,
            searches_failed: counter(
                &registry,
                "farescout_searches_failed_total",
                "Saved searches whose check hit an error",
            )?,
            observations: counter(
                &registry,
                "farescout_price_observations_total",
                "Prices recorded into history",
            )?,
            quote_failures: counter(
                &registry,
                "farescout_quote_failures_total",
                "Price lookups that failed or timed out",
            )?,
            alerts_created: counter(&registry, "farescout_alerts_created_total", "Alerts raised")?,
            alerts_sent: counter(&registry, "farescout_alerts_sent_total", "Alerts delivered by email")?,
            dispatch_failures: counter(
                &registry,
                "farescout_dispatch_failures_total",
                "Alert emails that could not be delivered",
            )?,
            registry,
        })
    }

    pub fn record_tick(&self, summary: &TickSummary) {
        self.ticks.inc();
        self.searches_checked.inc_by(summary.searches_checked as u64);
        self.searches_failed.inc_by(summary.searches_failed as u64);
        self.observations.inc_by(summary.observations as u64);
        self.quote_failures.inc_by(summary.quote_failures as u64);
        self.alerts_created.inc_by(summary.alerts_created as u64);
        self.alerts_sent.inc_by(summary.alerts_sent as u64);
        self.dispatch_failures.inc_by(summary.dispatch_failures as u64);
    }

    /// Prometheus text exposition of the registry
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
