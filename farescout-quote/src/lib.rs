pub mod adapter;
pub mod cache;
pub mod kiwi;
pub mod lookup;
pub mod mock;
pub mod normalize;
pub mod search;
pub mod vendor;

pub use adapter::{QuoteAdapter, QuoteSettings};
pub use cache::QuoteCache;
pub use kiwi::{KiwiClient, KiwiConfig};
pub use lookup::{LookupError, PriceLookup, QuoteRequest};
pub use mock::MockPriceLookup;
pub use normalize::BookingLinks;
pub use search::FlightSearch;
pub use vendor::{RawDuration, RawOffer, RawSegment, VendorResponse};
