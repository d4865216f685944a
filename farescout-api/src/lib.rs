use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod alerts;
pub mod destinations;
pub mod error;
pub mod flights;
pub mod health;
pub mod holidays;
pub mod metrics;
pub mod params;
pub mod searches;
pub mod state;
pub mod worker;

pub use metrics::Metrics;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(health::routes())
        .merge(destinations::routes())
        .merge(flights::routes())
        .merge(searches::routes())
        .merge(alerts::routes())
        .merge(holidays::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
