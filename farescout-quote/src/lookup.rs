use async_trait::async_trait;
use chrono::NaiveDate;

use crate::vendor::VendorResponse;

/// Parameters of a single fare lookup. Doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteRequest {
    pub origin: String,
    pub destination: String,
    pub outbound: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub max_price: Option<i32>,
}

impl QuoteRequest {
    pub fn round_trip(origin: &str, destination: &str, outbound: NaiveDate, return_date: NaiveDate) -> Self {
        Self {
            origin: origin.to_ascii_uppercase(),
            destination: destination.to_ascii_uppercase(),
            outbound,
            return_date: Some(return_date),
            max_price: None,
        }
    }

    pub fn with_max_price(mut self, max_price: Option<i32>) -> Self {
        self.max_price = max_price;
        self
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Price provider is not configured: {0}")]
    NotConfigured(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed provider payload: {0}")]
    Malformed(String),
    #[error("Lookup timed out after {0}s")]
    Timeout(u64),
}

/// External flight-price lookup
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn lookup(&self, request: &QuoteRequest) -> Result<VendorResponse, LookupError>;
}
