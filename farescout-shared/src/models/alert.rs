use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::offer::CandidateOffer;

/// A price alert raised for a saved search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub search_id: Uuid,
    pub destination: String,
    pub current_price: i32,
    pub target_price: i32,
    /// Signed percent change against the previous observation
    pub price_change: Option<i32>,
    /// Snapshot of the offer that triggered the alert
    pub flight_details: CandidateOffer,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub search_id: Uuid,
    pub destination: String,
    pub current_price: i32,
    pub target_price: i32,
    #[serde(default)]
    pub price_change: Option<i32>,
    pub flight_details: CandidateOffer,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn from_new(new: NewAlert) -> Self {
        Self {
            id: Uuid::new_v4(),
            search_id: new.search_id,
            destination: new.destination,
            current_price: new.current_price,
            target_price: new.target_price,
            price_change: new.price_change,
            flight_details: new.flight_details,
            sent: false,
            created_at: new.created_at,
        }
    }

    /// Created and successfully delivered at or after `since`
    pub fn sent_since(&self, since: DateTime<Utc>) -> bool {
        self.sent && self.created_at >= since
    }
}
