use anyhow::Context;
use farescout_alert::{AlertEngine, AlertPolicy, AlertSettings, ResendConfig, ResendNotifier};
use farescout_api::{app, worker, AppState, Metrics};
use farescout_catalog::{AirportDirectory, Catalog, DestinationScorer, Discovery};
use farescout_core::clock::{Clock, SystemClock};
use farescout_core::repository::{AlertRepository, PriceHistoryRepository, SearchRepository};
use farescout_quote::{BookingLinks, FlightSearch, KiwiClient, KiwiConfig, QuoteAdapter, QuoteCache, QuoteSettings};
use farescout_store::app_config::Config;
use farescout_store::{DbClient, MemoryStore, PgAlertRepository, PgPriceHistoryRepository, PgSearchRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Repositories {
    searches: Arc<dyn SearchRepository>,
    history: Arc<dyn PriceHistoryRepository>,
    alerts: Arc<dyn AlertRepository>,
}

async fn repositories(config: &Config) -> anyhow::Result<Repositories> {
    if config.database.is_memory() {
        tracing::warn!("Using the in-memory store; data is lost on restart");
        let store = Arc::new(MemoryStore::new());
        return Ok(Repositories {
            searches: store.clone(),
            history: store.clone(),
            alerts: store,
        });
    }

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    Ok(Repositories {
        searches: Arc::new(PgSearchRepository::new(db.pool.clone())),
        history: Arc::new(PgPriceHistoryRepository::new(db.pool.clone())),
        alerts: Arc::new(PgAlertRepository::new(db.pool)),
    })
}

async fn shutdown_signal(tx: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
    tracing::info!("Shutdown signal received");
    let _ = tx.send(true);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farescout_api=debug,farescout_alert=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!(run_mode = %config.run_mode, "Starting FareScout on port {}", config.server.port);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repos = repositories(&config).await?;

    let catalog = Catalog::load(config.catalog.path.as_deref()).context("Failed to load destination catalog")?;
    let airports = AirportDirectory::embedded().context("Failed to load airport directory")?;
    let discovery = Arc::new(Discovery::new(Arc::new(catalog), airports, DestinationScorer::default()));

    let provider = &config.provider;
    if provider.api_key.is_empty() {
        tracing::warn!("provider.api_key is not set; every price lookup will fail");
    }
    let kiwi = KiwiClient::new(KiwiConfig {
        base_url: provider.base_url.clone(),
        api_key: provider.api_key.clone(),
        partner_id: provider.partner_id.clone(),
        currency: provider.currency.clone(),
        locale: provider.locale.clone(),
        limit: provider.max_results,
        timeout: provider.timeout(),
    })
    .context("Failed to build price provider client")?;
    let quotes = Arc::new(QuoteAdapter::new(
        Arc::new(kiwi),
        QuoteCache::new(chrono::Duration::seconds(provider.cache_ttl_secs), clock.clone()),
        BookingLinks::new(
            &provider.booking_base_url,
            &provider.currency,
            &provider.locale,
            provider.partner_id.clone(),
        ),
        QuoteSettings {
            currency: provider.currency.clone(),
            max_results: provider.max_results,
            timeout: provider.timeout(),
        },
    ));
    let flights = Arc::new(FlightSearch::new(quotes.clone(), clock.clone()));

    let email_timeout = Duration::from_secs(config.email.timeout_secs);
    let notifier = Arc::new(
        ResendNotifier::new(ResendConfig {
            api_url: config.email.api_url.clone(),
            api_key: config.email.api_key.clone(),
            from: config.email.from.clone(),
            timeout: email_timeout,
        })
        .context("Failed to build email client")?,
    );

    let metrics = Arc::new(Metrics::new().context("Failed to register metrics")?);

    let alerts = &config.alerts;
    let engine = Arc::new(AlertEngine::new(
        repos.searches.clone(),
        repos.history.clone(),
        repos.alerts.clone(),
        quotes,
        notifier.clone(),
        clock.clone(),
        AlertSettings {
            policy: AlertPolicy {
                drop_threshold_percent: alerts.drop_threshold_percent,
                deal_ratio: alerts.deal_ratio,
                target_ratio: alerts.target_ratio,
                dedup_window: chrono::Duration::hours(alerts.dedup_window_hours),
            },
            sample_size: alerts.sample_size,
            dispatch_timeout: email_timeout,
        },
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let workers = if config.scheduler.enabled {
        worker::start_alert_worker(
            engine,
            &config.scheduler,
            config.is_development(),
            metrics.clone(),
            shutdown_rx.clone(),
        )
    } else {
        tracing::info!("Alert scheduler disabled");
        Vec::new()
    };

    let app_state = AppState {
        discovery,
        flights,
        searches: repos.searches,
        alerts: repos.alerts,
        notifier,
        clock,
        metrics,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("Server error")?;

    for handle in workers {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Alert worker ended abnormally");
        }
    }
    tracing::info!("FareScout stopped");
    Ok(())
}
