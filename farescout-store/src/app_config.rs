use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Filled in by `load` from `RUN_MODE`
    #[serde(skip)]
    pub run_mode: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL
    }
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub partner_id: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: i64,
    pub booking_base_url: String,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_locale() -> String {
    "fr".to_string()
}

fn default_max_results() -> usize {
    10
}

fn default_provider_timeout() -> u64 {
    15
}

fn default_cache_ttl() -> i64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    pub from: String,
    #[serde(default = "default_email_timeout")]
    pub timeout_secs: u64,
}

fn default_email_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub dev_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 6 * 60 * 60,
            dev_interval_secs: 30 * 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    pub drop_threshold_percent: i32,
    pub deal_ratio: f64,
    pub target_ratio: f64,
    pub dedup_window_hours: i64,
    pub sample_size: usize,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            drop_threshold_percent: 10,
            deal_ratio: 0.8,
            target_ratio: 0.9,
            dedup_window_hours: 24,
            sample_size: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Replaces the embedded destination table when set
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. FARESCOUT__DATABASE__URL
            .add_source(config::Environment::with_prefix("FARESCOUT").separator("__"))
            .build()?;

        let mut config: Config = s.try_deserialize()?;
        config.run_mode = run_mode;
        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.run_mode == "development"
    }
}
