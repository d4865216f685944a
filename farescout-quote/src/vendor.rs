//! Wire format of the Tequila-style `/v2/search` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorResponse {
    #[serde(default)]
    pub data: Vec<RawOffer>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOffer {
    pub id: String,
    #[serde(rename = "flyFrom")]
    pub fly_from: String,
    #[serde(rename = "flyTo")]
    pub fly_to: String,
    #[serde(rename = "cityFrom", default)]
    pub city_from: String,
    #[serde(rename = "cityTo", default)]
    pub city_to: String,
    pub price: f64,
    #[serde(default)]
    pub airlines: Vec<String>,
    #[serde(default)]
    pub route: Vec<RawSegment>,
    #[serde(default)]
    pub duration: RawDuration,
    #[serde(default)]
    pub deep_link: Option<String>,
    #[serde(default)]
    pub booking_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(rename = "flyFrom")]
    pub fly_from: String,
    #[serde(rename = "flyTo")]
    pub fly_to: String,
    /// Local ISO timestamp, e.g. `2025-03-07T06:15:00.000Z`
    pub local_departure: String,
    #[serde(default)]
    pub local_arrival: String,
    #[serde(default)]
    pub airline: String,
    /// 1 on the way back
    #[serde(rename = "return", default)]
    pub return_leg: u8,
}

/// Leg durations in seconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDuration {
    #[serde(default)]
    pub departure: u64,
    #[serde(rename = "return", default)]
    pub return_leg: u64,
    #[serde(default)]
    pub total: u64,
}
