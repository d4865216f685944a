pub mod models;
pub mod pii;

pub use models::{
    Alert, CandidateOffer, DatePattern, DateRange, Destination, NewAlert, NewPriceHistory,
    NewSearch, PatternKind, PriceHistoryEntry, ScoredDestination, Search,
};
pub use pii::Masked;
