//! REST API over the live station fleet.
//!
//! Provides two GET endpoints:
//! - `/stations`: stations ranked for a rider query
//! - `/stations/{id}`: one station with optional travel figures and history

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::StationSimulator;

pub use types::{ErrorResponse, StationDetailResponse, StationsResponse};

/// Application state shared across all request handlers.
///
/// The simulator carries its own lock, so the state itself is shared
/// through a plain `Arc`.
pub struct AppState {
    /// Process-wide station fleet.
    pub simulator: StationSimulator,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/stations", get(handlers::list_stations))
        .route("/stations/{id}", get(handlers::get_station))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
