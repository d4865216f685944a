use serde::{Deserialize, Serialize};

/// Catalog entry. Reference data, never mutated after load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub iata_code: String,
    pub city_name: String,
    pub country_name: String,
    pub country_code: String,
    pub continent: String,
    pub latitude: f64,
    pub longitude: f64,
    /// How unexpected / inspiring the place is, in [0, 1]
    pub uniqueness_score: f64,
    #[serde(default)]
    pub description: String,
}

/// A catalog entry enriched for one origin and budget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDestination {
    #[serde(flatten)]
    pub destination: Destination,
    /// Great-circle distance from the origin, km
    pub distance: f64,
    /// Estimated flight time, minutes
    pub flight_duration: u32,
    pub score: f64,
}
