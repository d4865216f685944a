use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::lookup::{LookupError, PriceLookup, QuoteRequest};
use crate::vendor::{RawDuration, RawOffer, RawSegment, VendorResponse};

/// Scripted price provider: one direct round-trip offer per configured price,
/// dated on the requested days.
#[derive(Default)]
pub struct MockPriceLookup {
    prices: Mutex<HashMap<String, Vec<i32>>>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl MockPriceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prices(&self, destination: &str, prices: Vec<i32>) {
        self.prices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(destination.to_ascii_uppercase(), prices);
    }

    pub fn set_price(&self, destination: &str, price: i32) {
        self.set_prices(destination, vec![price]);
    }

    /// Every lookup for `destination` fails with a 503
    pub fn fail_destination(&self, destination: &str) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(destination.to_ascii_uppercase());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn offer(request: &QuoteRequest, index: usize, price: i32) -> RawOffer {
        let outbound = format!("{}T07:00:00.000Z", request.outbound);
        let mut route = vec![RawSegment {
            fly_from: request.origin.clone(),
            fly_to: request.destination.clone(),
            local_departure: outbound,
            local_arrival: String::new(),
            airline: "XX".to_string(),
            return_leg: 0,
        }];
        if let Some(back) = request.return_date {
            route.push(RawSegment {
                fly_from: request.destination.clone(),
                fly_to: request.origin.clone(),
                local_departure: format!("{}T18:00:00.000Z", back),
                local_arrival: String::new(),
                airline: "XX".to_string(),
                return_leg: 1,
            });
        }

        RawOffer {
            id: format!("{}-{}-{}-{}", request.origin, request.destination, request.outbound, index),
            fly_from: request.origin.clone(),
            fly_to: request.destination.clone(),
            city_from: String::new(),
            city_to: String::new(),
            price: price as f64,
            airlines: vec!["XX".to_string()],
            route,
            duration: RawDuration {
                departure: 3 * 3600,
                return_leg: 3 * 3600,
                total: 6 * 3600,
            },
            deep_link: None,
            booking_token: Some(format!("mock-token-{}", index)),
        }
    }
}

#[async_trait]
impl PriceLookup for MockPriceLookup {
    async fn lookup(&self, request: &QuoteRequest) -> Result<VendorResponse, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&request.destination);
        if failing {
            return Err(LookupError::Status {
                status: 503,
                body: "simulated provider outage".to_string(),
            });
        }

        let prices = self
            .prices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&request.destination)
            .cloned()
            .unwrap_or_default();

        Ok(VendorResponse {
            data: prices
                .into_iter()
                .enumerate()
                .map(|(i, price)| Self::offer(request, i, price))
                .collect(),
            currency: Some("EUR".to_string()),
        })
    }
}
