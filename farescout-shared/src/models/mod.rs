pub mod alert;
pub mod destination;
pub mod history;
pub mod offer;
pub mod pattern;
pub mod search;

pub use alert::{Alert, NewAlert};
pub use destination::{Destination, ScoredDestination};
pub use history::{NewPriceHistory, PriceHistoryEntry};
pub use offer::CandidateOffer;
pub use pattern::{DatePattern, DateRange, PatternKind};
pub use search::{NewSearch, Search};
