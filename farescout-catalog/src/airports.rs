use serde::{Deserialize, Serialize};

use crate::destination::CatalogError;

const EMBEDDED_AIRPORTS: &str = include_str!("../data/airports.json");

/// Departure airport a discovery can start from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub iata_code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct AirportDirectory {
    airports: Vec<Airport>,
}

impl AirportDirectory {
    pub fn embedded() -> Result<Self, CatalogError> {
        let airports: Vec<Airport> = serde_json::from_str(EMBEDDED_AIRPORTS)?;
        Ok(Self { airports })
    }

    pub fn new(airports: Vec<Airport>) -> Self {
        Self { airports }
    }

    /// Case-insensitive lookup by IATA code
    pub fn resolve(&self, code: &str) -> Option<&Airport> {
        self.airports
            .iter()
            .find(|a| a.iata_code.eq_ignore_ascii_case(code.trim()))
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }
}
