pub mod alert_repo;
pub mod app_config;
pub mod database;
pub mod history_repo;
pub mod memory_repo;
pub mod search_repo;

pub use alert_repo::PgAlertRepository;
pub use app_config::Config;
pub use database::DbClient;
pub use history_repo::PgPriceHistoryRepository;
pub use memory_repo::MemoryStore;
pub use search_repo::PgSearchRepository;
