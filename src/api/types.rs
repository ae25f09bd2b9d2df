//! API response envelopes.

use serde::Serialize;

use crate::detail::StationDetail;
use crate::ranking::RankedStation;

/// Ranked list response: `{"stations": [...]}`.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<RankedStation>,
}

/// Detail response: `{"station": {...}}`.
#[derive(Debug, Serialize)]
pub struct StationDetailResponse {
    pub station: StationDetail,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
