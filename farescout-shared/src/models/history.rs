use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One observed price for a (search, destination, outbound date)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryEntry {
    pub id: Uuid,
    pub search_id: Uuid,
    pub destination: String,
    pub price: i32,
    pub currency: String,
    /// Outbound date the price was quoted for
    pub date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPriceHistory {
    pub search_id: Uuid,
    pub destination: String,
    pub price: i32,
    pub currency: String,
    pub date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

impl PriceHistoryEntry {
    pub fn from_new(new: NewPriceHistory) -> Self {
        Self {
            id: Uuid::new_v4(),
            search_id: new.search_id,
            destination: new.destination,
            price: new.price,
            currency: new.currency,
            date: new.date,
            recorded_at: new.recorded_at,
        }
    }
}
