use farescout_shared::Destination;
use std::collections::HashSet;
use std::path::Path;

const EMBEDDED_CATALOG: &str = include_str!("../data/destinations.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate IATA code in catalog: {0}")]
    DuplicateCode(String),
    #[error("Uniqueness score {score} of {code} is outside [0, 1]")]
    InvalidScore { code: String, score: f64 },
    #[error("Catalog is empty")]
    Empty,
}

/// Immutable table of candidate destinations, in catalog order
#[derive(Debug, Clone)]
pub struct Catalog {
    destinations: Vec<Destination>,
}

impl Catalog {
    /// The destination table compiled into the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Loads from `path` when given, the embedded table otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::embedded()?,
        };
        tracing::info!(destinations = catalog.len(), "Destination catalog loaded");
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let destinations: Vec<Destination> = serde_json::from_str(raw)?;
        Self::new(destinations)
    }

    pub fn new(destinations: Vec<Destination>) -> Result<Self, CatalogError> {
        if destinations.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for dest in &destinations {
            if !seen.insert(dest.iata_code.as_str()) {
                return Err(CatalogError::DuplicateCode(dest.iata_code.clone()));
            }
            if !(0.0..=1.0).contains(&dest.uniqueness_score) {
                return Err(CatalogError::InvalidScore {
                    code: dest.iata_code.clone(),
                    score: dest.uniqueness_score,
                });
            }
        }

        Ok(Self { destinations })
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn get(&self, code: &str) -> Option<&Destination> {
        self.destinations
            .iter()
            .find(|d| d.iata_code.eq_ignore_ascii_case(code))
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}
