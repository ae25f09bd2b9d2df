//! Single-station detail view.

use rand::Rng;
use serde::Serialize;

use crate::geo::GeoPoint;
use crate::ranking::{compute_travel_eta, estimate_wait};
use crate::sim::StationState;

/// Number of samples in a synthetic reliability history.
pub const HISTORY_POINTS: usize = 20;

/// Maximum per-sample change of the reliability history walk.
const HISTORY_STEP: f64 = 0.01;

/// One sample of recent reliability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReliabilityPoint {
    pub t: usize,
    pub reliability: f64,
}

/// A station with travel figures for an optional origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDetail {
    #[serde(flatten)]
    pub station: StationState,
    /// `None` when no origin was supplied.
    pub travel_eta_min: Option<u32>,
    /// `None` when no origin was supplied.
    pub distance_km: Option<f64>,
    pub est_wait_min: u32,
    pub reliability_history: Vec<ReliabilityPoint>,
}

/// Builds the detail view for `station`.
///
/// # Arguments
///
/// * `station` - Snapshot of the station
/// * `origin` - Rider position and battery percentage, if known
/// * `min_reliability` / `max_reliability` - Bounds for the history walk
/// * `rng` - Source for the history noise
pub fn describe_station<R: Rng>(
    station: StationState,
    origin: Option<(GeoPoint, f64)>,
    (min_reliability, max_reliability): (f64, f64),
    rng: &mut R,
) -> StationDetail {
    let estimate = origin.map(|(point, battery)| compute_travel_eta(point, &station, battery));
    let est_wait_min = estimate_wait(station.queue_length);
    let reliability_history = reliability_history(
        station.reliability,
        HISTORY_POINTS,
        min_reliability,
        max_reliability,
        rng,
    );

    StationDetail {
        travel_eta_min: estimate.map(|e| e.travel_eta_min),
        distance_km: estimate.map(|e| e.distance_km),
        est_wait_min,
        reliability_history,
        station,
    }
}

/// Generates a plausible recent reliability trace ending near `current`.
///
/// A bounded random walk starts at `current`; each sample adds uniform noise
/// in `±0.01`, is clamped to `[min, max]` and rounded to three decimals.
/// Samples are produced newest-first with descending `t`, then reversed.
pub fn reliability_history<R: Rng>(
    current: f64,
    points: usize,
    min: f64,
    max: f64,
    rng: &mut R,
) -> Vec<ReliabilityPoint> {
    let mut out = Vec::with_capacity(points);
    let mut value = current;
    for t in (0..points).rev() {
        let noise = (rng.random::<f64>() - 0.5) * 2.0 * HISTORY_STEP;
        value = (value + noise).clamp(min, max);
        out.push(ReliabilityPoint {
            t,
            reliability: (value * 1000.0).round() / 1000.0,
        });
    }
    out.reverse();
    out
}
