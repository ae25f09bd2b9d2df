//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::debug;

use super::AppState;
use super::types::{ErrorResponse, StationDetailResponse, StationsResponse};
use crate::detail::describe_station;
use crate::query::RawQuery;
use crate::ranking::rank;

/// Returns stations ranked for the rider query.
///
/// `GET /stations?lat=..&lng=..&radiusKm=..&battery=..` → 200 + `StationsResponse`
/// `GET /stations?lat=abc` → 400 + `ErrorResponse`
pub async fn list_stations(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<RawQuery>,
) -> Response {
    let query = match raw.rank_query() {
        Ok(q) => q,
        Err(e) => {
            debug!(error = %e, "rejected station query");
            return error(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let snapshot = state.simulator.list_stations();
    let stations = rank(query.origin, query.battery_pct, query.radius_km, &snapshot);
    debug!(
        origin = %query.origin,
        radius_km = query.radius_km,
        matches = stations.len(),
        "ranked stations"
    );
    no_store(StationsResponse { stations })
}

/// Returns one station with travel figures when an origin is given.
///
/// `GET /stations/{id}` → 200 + `StationDetailResponse` (null ETA/distance)
/// `GET /stations/{id}?lat=..&lng=..&battery=..` → 200 with ETA/distance
/// `GET /stations/unknown` → 404 + `ErrorResponse`
pub async fn get_station(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(raw): Query<RawQuery>,
) -> Response {
    let station = match state.simulator.get_station(&id) {
        Ok(s) => s,
        Err(_) => return error(StatusCode::NOT_FOUND, "Not found".to_string()),
    };

    let params = state.simulator.params();
    let detail = describe_station(
        station,
        raw.detail_origin(),
        (params.min_reliability, params.max_reliability),
        &mut rand::rng(),
    );
    no_store(StationDetailResponse { station: detail })
}

fn no_store<T: Serialize>(body: T) -> Response {
    ([(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
}

fn error(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}
