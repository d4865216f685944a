pub mod airports;
pub mod destination;
pub mod discovery;
pub mod scoring;

pub use airports::{Airport, AirportDirectory};
pub use destination::{Catalog, CatalogError};
pub use discovery::Discovery;
pub use scoring::{DestinationScorer, ScoringConfig};
