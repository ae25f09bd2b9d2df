//! Error types shared across the locator.

use thiserror::Error;

/// Errors raised by station lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StationError {
    #[error("station \"{0}\" not found")]
    NotFound(String),
}

/// Errors raised while turning raw request parameters into a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("invalid query params, expected finite lat, lng, radiusKm, battery ({0})")]
    InvalidParams(&'static str),

    #[error("unknown address \"{name}\", available: {available}")]
    UnknownAddress { name: String, available: String },
}
