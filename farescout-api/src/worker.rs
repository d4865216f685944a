use farescout_alert::{AlertEngine, AlertScheduler, Schedule};
use farescout_store::app_config::SchedulerConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::metrics::Metrics;

/// Starts the periodic alert checks, feeding every tick summary into `metrics`.
/// `dev_mode` adds the faster development cadence.
pub fn start_alert_worker(
    engine: Arc<AlertEngine>,
    config: &SchedulerConfig,
    dev_mode: bool,
    metrics: Arc<Metrics>,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    let schedules = Schedule::standard(
        Duration::from_secs(config.interval_secs),
        Duration::from_secs(config.dev_interval_secs),
        dev_mode,
    );
    info!(schedules = schedules.len(), "Alert worker started");

    AlertScheduler::new(engine, schedules)
        .with_reporter(move |summary| {
            metrics.record_tick(summary);
            info!(
                checked = summary.searches_checked,
                failed = summary.searches_failed,
                alerts_created = summary.alerts_created,
                alerts_sent = summary.alerts_sent,
                "Alert tick completed"
            );
        })
        .start(shutdown)
}
