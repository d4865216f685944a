use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::engine::{AlertEngine, TickSummary};

type Reporter = Arc<dyn Fn(&TickSummary) + Send + Sync>;

/// A named cadence driving the alert tick
#[derive(Debug, Clone)]
pub struct Schedule {
    pub name: String,
    pub every: Duration,
}

impl Schedule {
    pub fn new(name: &str, every: Duration) -> Self {
        Self {
            name: name.to_string(),
            every,
        }
    }

    /// The production cadence, plus the faster development one when `dev_mode` is set
    pub fn standard(interval: Duration, dev_interval: Duration, dev_mode: bool) -> Vec<Schedule> {
        let mut schedules = vec![Schedule::new("alerts", interval)];
        if dev_mode {
            schedules.push(Schedule::new("alerts-dev", dev_interval));
        }
        schedules
    }
}

/// Runs `run_alert_tick` on one or more cadences until shut down
pub struct AlertScheduler {
    engine: Arc<AlertEngine>,
    schedules: Vec<Schedule>,
    reporter: Option<Reporter>,
}

impl AlertScheduler {
    pub fn new(engine: Arc<AlertEngine>, schedules: Vec<Schedule>) -> Self {
        Self {
            engine,
            schedules,
            reporter: None,
        }
    }

    /// Called with the summary of every completed tick
    pub fn with_reporter<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&TickSummary) + Send + Sync + 'static,
    {
        self.reporter = Some(Arc::new(reporter));
        self
    }

    /// Spawns one task per schedule. The first tick of each fires one period
    /// after start; a tick in flight when `shutdown` flips is abandoned.
    pub fn start(self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        self.schedules
            .into_iter()
            .map(|schedule| {
                let engine = self.engine.clone();
                let reporter = self.reporter.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(run_schedule(engine, schedule, reporter, shutdown))
            })
            .collect()
    }
}

async fn run_schedule(
    engine: Arc<AlertEngine>,
    schedule: Schedule,
    reporter: Option<Reporter>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(schedule = %schedule.name, every_secs = schedule.every.as_secs(), "Alert schedule started");

    let mut ticker = interval_at(Instant::now() + schedule.every, schedule.every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        tokio::select! {
            result = engine.run_alert_tick() => match result {
                Ok(summary) => {
                    if let Some(report) = &reporter {
                        report(&summary);
                    }
                }
                Err(e) => error!(schedule = %schedule.name, error = %e, "Alert tick failed"),
            },
            _ = shutdown.changed() => break,
        }
    }

    info!(schedule = %schedule.name, "Alert schedule stopped");
}
