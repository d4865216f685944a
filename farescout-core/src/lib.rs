pub mod clock;
pub mod dates;
pub mod geo;
pub mod notifier;
pub mod repository;
pub mod validation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Price quote unavailable: {0}")]
    QuoteUnavailable(String),
    #[error("Notification dispatch failed: {0}")]
    DispatchFailure(String),
    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl CoreError {
    /// Errors the caller can recover from by skipping the unit of work
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CoreError::QuoteUnavailable(_) | CoreError::DispatchFailure(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
