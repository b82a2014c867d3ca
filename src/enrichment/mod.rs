//! Third-party lookups that enrich a stored appointment.

pub mod directions;
pub mod events;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use directions::{DirectionsGateway, GoogleDirections};
pub use events::{EventbriteEvents, EventsGateway};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Upstream could not resolve the location or route.
    #[error("{0}")]
    NotFound(String),

    /// Upstream rejected the arguments (e.g. an unknown location).
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Status(String),

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected upstream payload: {0}")]
    Payload(String),
}

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::enrichment_routes())
}
