//! Travel-time estimation and station ranking.
//!
//! Everything here is pure: functions take a station snapshot and return new
//! values, so concurrent queries need no coordination.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::geo::GeoPoint;
use crate::sim::StationState;

/// Floor on effective travel speed regardless of battery (limp mode).
pub const MIN_EFFECTIVE_SPEED_KPH: f64 = 10.0;

/// Fixed service time per vehicle ahead in the queue.
pub const MINUTES_PER_SWAP: u32 = 6;

/// Kilometres to statute miles.
pub const KM_TO_MILES: f64 = 0.621371;

/// Distance and drive time from an origin to one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub travel_eta_min: u32,
}

/// A station annotated with query-specific travel and wait figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStation {
    #[serde(flatten)]
    pub station: StationState,
    pub distance_km: f64,
    pub travel_eta_min: u32,
    pub est_wait_min: u32,
}

/// Computes haversine distance and battery-adjusted drive time.
///
/// Battery scales speed linearly from 50 % of nominal at 0 % charge to full
/// speed at 100 %, with a floor of [`MIN_EFFECTIVE_SPEED_KPH`]. `battery_pct`
/// is clamped to `[0, 100]`.
///
/// # Examples
///
/// ```
/// use swap_locator::geo::GeoPoint;
/// use swap_locator::ranking::compute_travel_eta;
/// use swap_locator::sim::StationState;
///
/// let station = StationState {
///     id: "blr-1".into(),
///     name: "Koramangala Swap Hub".into(),
///     lat: 12.9352,
///     lng: 77.6245,
///     avg_speed_kph: 42.0,
///     queue_length: 4,
///     reliability: 0.93,
/// };
/// let origin = GeoPoint::new(12.9716, 77.5946);
///
/// assert_eq!(compute_travel_eta(origin, &station, 100.0).travel_eta_min, 7);
/// assert_eq!(compute_travel_eta(origin, &station, 0.0).travel_eta_min, 15);
/// ```
pub fn compute_travel_eta(origin: GeoPoint, station: &StationState, battery_pct: f64) -> TravelEstimate {
    let distance_km = origin.distance_km(station.location());

    let battery_factor = 0.5 + 0.5 * battery_pct.clamp(0.0, 100.0) / 100.0;
    let effective_speed = (station.avg_speed_kph * battery_factor).max(MIN_EFFECTIVE_SPEED_KPH);

    let minutes = (distance_km / effective_speed * 60.0).round();
    TravelEstimate {
        distance_km,
        travel_eta_min: minutes as u32,
    }
}

/// Expected wait in minutes for a queue of `queue_length` vehicles.
pub fn estimate_wait(queue_length: u32) -> u32 {
    queue_length.saturating_mul(MINUTES_PER_SWAP)
}

/// Ranks stations within `radius_km` of `origin`.
///
/// Stations farther than `radius_km` are dropped. The rest are ordered by
/// travel ETA, then shorter queue, then higher reliability. The sort is
/// stable, so full ties keep snapshot order.
///
/// # Arguments
///
/// * `origin` - Rider position
/// * `battery_pct` - Remaining charge, clamped to `[0, 100]`
/// * `radius_km` - Search radius
/// * `stations` - Snapshot from the simulator; not modified
pub fn rank(
    origin: GeoPoint,
    battery_pct: f64,
    radius_km: f64,
    stations: &[StationState],
) -> Vec<RankedStation> {
    let mut ranked: Vec<RankedStation> = stations
        .iter()
        .map(|s| {
            let est = compute_travel_eta(origin, s, battery_pct);
            RankedStation {
                station: s.clone(),
                distance_km: est.distance_km,
                travel_eta_min: est.travel_eta_min,
                est_wait_min: estimate_wait(s.queue_length),
            }
        })
        .filter(|r| r.distance_km <= radius_km)
        .collect();

    ranked.sort_by(rank_order);
    ranked
}

fn rank_order(a: &RankedStation, b: &RankedStation) -> Ordering {
    a.travel_eta_min
        .cmp(&b.travel_eta_min)
        .then(a.station.queue_length.cmp(&b.station.queue_length))
        .then(b.station.reliability.total_cmp(&a.station.reliability))
}

/// Optional rider-side limits applied after ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankFilter {
    /// Keep stations with at most this many vehicles queued.
    pub max_queue: Option<u32>,
    /// Keep stations whose reliability, as a rounded percentage, is at least this.
    pub min_reliability_pct: Option<u32>,
}

impl RankFilter {
    /// Whether `station` passes every configured limit.
    pub fn accepts(&self, station: &StationState) -> bool {
        let queue_ok = self.max_queue.is_none_or(|max| station.queue_length <= max);
        let reliability_ok = self
            .min_reliability_pct
            .is_none_or(|min| (station.reliability * 100.0).round() >= f64::from(min));
        queue_ok && reliability_ok
    }

    /// Drops ranked entries that fail the limits, keeping rank order.
    pub fn apply(&self, ranked: Vec<RankedStation>) -> Vec<RankedStation> {
        ranked.into_iter().filter(|r| self.accepts(&r.station)).collect()
    }
}

/// Unit used when reporting distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceUnit {
    #[default]
    Km,
    Mi,
}

impl DistanceUnit {
    /// Parses `"km"` or `"mi"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "km" => Some(Self::Km),
            "mi" | "miles" => Some(Self::Mi),
            _ => None,
        }
    }

    /// Converts a distance in kilometres to this unit.
    pub fn convert(self, km: f64) -> f64 {
        match self {
            Self::Km => km,
            Self::Mi => km * KM_TO_MILES,
        }
    }

    /// Formats a distance in kilometres with one decimal, e.g. `"3.2 mi"`.
    pub fn format(self, km: f64) -> String {
        format!("{:.1} {self}", self.convert(km))
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Km => f.write_str("km"),
            Self::Mi => f.write_str("mi"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, lat: f64, lng: f64, speed: f64, queue: u32, reliability: f64) -> StationState {
        StationState {
            id: id.to_string(),
            name: format!("Station {id}"),
            lat,
            lng,
            avg_speed_kph: speed,
            queue_length: queue,
            reliability,
        }
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(12.9716, 77.5946)
    }

    #[test]
    fn worked_example_full_and_empty_battery() {
        let s = station("blr-1", 12.9352, 77.6245, 42.0, 4, 0.93);

        let full = compute_travel_eta(origin(), &s, 100.0);
        assert!((full.distance_km - 5.1847).abs() < 1e-3, "{}", full.distance_km);
        assert_eq!(full.travel_eta_min, 7);

        let empty = compute_travel_eta(origin(), &s, 0.0);
        assert_eq!(empty.distance_km, full.distance_km);
        assert_eq!(empty.travel_eta_min, 15);
    }

    #[test]
    fn battery_outside_range_is_clamped() {
        let s = station("blr-1", 12.9352, 77.6245, 42.0, 4, 0.93);
        assert_eq!(
            compute_travel_eta(origin(), &s, 150.0),
            compute_travel_eta(origin(), &s, 100.0)
        );
        assert_eq!(
            compute_travel_eta(origin(), &s, -20.0),
            compute_travel_eta(origin(), &s, 0.0)
        );
    }

    #[test]
    fn slow_station_hits_speed_floor() {
        // 12 kph * 0.5 = 6 kph, floored to 10 kph.
        let s = station("slow", 13.0616, 77.5946, 12.0, 0, 0.9);
        let est = compute_travel_eta(origin(), &s, 0.0);
        let expected = (est.distance_km / MIN_EFFECTIVE_SPEED_KPH * 60.0).round() as u32;
        assert_eq!(est.travel_eta_min, expected);
    }

    #[test]
    fn eta_never_increases_with_more_battery() {
        let s = station("blr-3", 13.0358, 77.597, 48.0, 2, 0.9);
        let mut prev = u32::MAX;
        for pct in 0..=100 {
            let eta = compute_travel_eta(origin(), &s, f64::from(pct)).travel_eta_min;
            assert!(eta <= prev, "eta rose at {pct}%: {prev} -> {eta}");
            prev = eta;
        }
    }

    #[test]
    fn coincident_origin_has_zero_eta() {
        let s = station("here", 12.9716, 77.5946, 40.0, 0, 0.9);
        let est = compute_travel_eta(origin(), &s, 50.0);
        assert_eq!(est.distance_km, 0.0);
        assert_eq!(est.travel_eta_min, 0);
    }

    #[test]
    fn wait_is_six_minutes_per_vehicle() {
        for q in 0..=12 {
            assert_eq!(estimate_wait(q), 6 * q);
        }
    }

    #[test]
    fn rank_drops_stations_outside_radius() {
        let stations = vec![
            station("near", 12.9352, 77.6245, 42.0, 4, 0.93),
            station("far", 12.9698, 77.7499, 45.0, 3, 0.95),
            station("other-city", 19.1197, 72.8468, 38.0, 6, 0.9),
        ];
        let ranked = rank(origin(), 60.0, 10.0, &stations);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].station.id, "near");
        assert!(ranked.iter().all(|r| r.distance_km <= 10.0));
    }

    #[test]
    fn rank_breaks_eta_ties_by_queue_then_reliability() {
        // Same coordinates and speed give identical ETAs.
        let stations = vec![
            station("q3-r90", 12.95, 77.60, 40.0, 3, 0.90),
            station("q1-r80", 12.95, 77.60, 40.0, 1, 0.80),
            station("q1-r95", 12.95, 77.60, 40.0, 1, 0.95),
            station("q1-r95-b", 12.95, 77.60, 40.0, 1, 0.95),
        ];
        let ranked = rank(origin(), 100.0, 50.0, &stations);
        let ids: Vec<&str> = ranked.iter().map(|r| r.station.id.as_str()).collect();
        assert_eq!(ids, ["q1-r95", "q1-r95-b", "q1-r80", "q3-r90"]);
    }

    #[test]
    fn rank_orders_by_eta_first() {
        let stations = vec![
            station("hebbal", 13.0358, 77.597, 48.0, 0, 0.99),
            station("koramangala", 12.9352, 77.6245, 42.0, 12, 0.75),
        ];
        let ranked = rank(origin(), 100.0, 25.0, &stations);
        assert_eq!(ranked[0].station.id, "koramangala");
        assert_eq!(ranked[0].est_wait_min, 72);
        assert!(ranked[0].travel_eta_min < ranked[1].travel_eta_min);
    }

    #[test]
    fn rank_leaves_input_untouched() {
        let stations = vec![
            station("b", 12.99, 77.60, 40.0, 2, 0.9),
            station("a", 12.97, 77.59, 40.0, 1, 0.9),
        ];
        let before = stations.clone();
        let _ = rank(origin(), 50.0, 20.0, &stations);
        assert_eq!(stations, before);
    }

    #[test]
    fn filter_applies_queue_and_rounded_reliability() {
        let filter = RankFilter {
            max_queue: Some(5),
            min_reliability_pct: Some(80),
        };
        assert!(filter.accepts(&station("a", 0.0, 0.0, 40.0, 5, 0.797)));
        assert!(!filter.accepts(&station("b", 0.0, 0.0, 40.0, 6, 0.95)));
        assert!(!filter.accepts(&station("c", 0.0, 0.0, 40.0, 1, 0.794)));
        assert!(RankFilter::default().accepts(&station("d", 0.0, 0.0, 40.0, 12, 0.75)));
    }

    #[test]
    fn distance_unit_formats_one_decimal() {
        assert_eq!(DistanceUnit::Km.format(5.184), "5.2 km");
        assert_eq!(DistanceUnit::Mi.format(10.0), "6.2 mi");
        assert_eq!(DistanceUnit::parse("mi"), Some(DistanceUnit::Mi));
        assert_eq!(DistanceUnit::parse("furlong"), None);
    }
}
