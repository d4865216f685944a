use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical flight quote, produced by normalizing a vendor offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateOffer {
    pub id: String,
    pub price: i32,
    pub currency: String,
    pub origin: String,
    pub destination: String,
    pub outbound_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    pub duration_minutes: u32,
    pub stops: u32,
    pub airlines: Vec<String>,
    pub booking_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_link: Option<String>,
}

impl CandidateOffer {
    /// "3h 25min"
    pub fn duration_label(&self) -> String {
        format!("{}h {}min", self.duration_minutes / 60, self.duration_minutes % 60)
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}
