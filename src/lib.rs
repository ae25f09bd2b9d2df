//! Battery-swap station locator with a live-drifting station fleet.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Single-station detail view.
pub mod detail;
pub mod error;
/// Coordinates and haversine distance.
pub mod geo;
pub mod io;
pub mod query;
pub mod ranking;
/// Station fleet simulator and its types.
pub mod sim;
