use farescout_catalog::Discovery;
use farescout_core::clock::Clock;
use farescout_core::notifier::Notifier;
use farescout_core::repository::{AlertRepository, SearchRepository};
use farescout_quote::FlightSearch;
use std::sync::Arc;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<Discovery>,
    pub flights: Arc<FlightSearch>,
    pub searches: Arc<dyn SearchRepository>,
    pub alerts: Arc<dyn AlertRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
}
