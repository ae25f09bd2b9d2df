//! Station records and the tunables of the dynamics step.

use serde::Serialize;

use crate::geo::GeoPoint;

/// Immutable reference record for one station.
///
/// Built once at startup and never mutated; the simulator uses
/// `baseline_reliability` as the anchor for mean reversion.
#[derive(Debug, Clone, PartialEq)]
pub struct StationBaseline {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub avg_speed_kph: f64,
    pub baseline_reliability: f64,
}

/// Live operational state of one station.
///
/// Only the simulator's advance step mutates `queue_length` and
/// `reliability`; everything else is copied from the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationState {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub avg_speed_kph: f64,
    /// Vehicles waiting for a swap (0 to `DynamicsParams::max_queue`).
    pub queue_length: u32,
    /// Fraction of swaps completed successfully, kept within the configured bounds.
    pub reliability: f64,
}

impl StationState {
    /// Creates the initial state for `baseline` with the given queue.
    pub fn from_baseline(baseline: &StationBaseline, queue_length: u32) -> Self {
        Self {
            id: baseline.id.clone(),
            name: baseline.name.clone(),
            lat: baseline.lat,
            lng: baseline.lng,
            avg_speed_kph: baseline.avg_speed_kph,
            queue_length,
            reliability: baseline.baseline_reliability,
        }
    }

    /// Station coordinates as a [`GeoPoint`].
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Numeric parameters of the advance step.
///
/// Defaults reproduce the reference dynamics: a 2 s throttle, one phase unit
/// per 13 s of wall clock, 5 % pull toward baseline and ±0.005 jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsParams {
    /// Minimum wall-clock seconds between two advances.
    pub throttle_secs: f64,
    /// Wall-clock seconds per unit of drift phase.
    pub phase_divisor_secs: f64,
    /// Phase offset between consecutive stations.
    pub station_phase_offset: f64,
    /// Fraction of the gap to baseline reliability closed per advance.
    pub reversion_rate: f64,
    /// Half-width of the uniform reliability jitter.
    pub reliability_jitter: f64,
    /// Upper bound for `queue_length`.
    pub max_queue: u32,
    pub min_reliability: f64,
    pub max_reliability: f64,
}

impl Default for DynamicsParams {
    fn default() -> Self {
        Self {
            throttle_secs: 2.0,
            phase_divisor_secs: 13.0,
            station_phase_offset: 1.337,
            reversion_rate: 0.05,
            reliability_jitter: 0.005,
            max_queue: 12,
            min_reliability: 0.75,
            max_reliability: 0.99,
        }
    }
}

impl DynamicsParams {
    /// Clamps a queue length after applying a signed drift.
    pub fn clamp_queue(&self, queue_length: u32, drift: i64) -> u32 {
        let next = i64::from(queue_length) + drift;
        // Result is within [0, max_queue], so the cast is lossless.
        next.clamp(0, i64::from(self.max_queue)) as u32
    }

    /// Clamps a reliability value into the configured bounds.
    pub fn clamp_reliability(&self, reliability: f64) -> f64 {
        reliability.clamp(self.min_reliability, self.max_reliability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> StationBaseline {
        StationBaseline {
            id: "blr-1".to_string(),
            name: "Koramangala Swap Hub".to_string(),
            lat: 12.9352,
            lng: 77.6245,
            avg_speed_kph: 42.0,
            baseline_reliability: 0.93,
        }
    }

    #[test]
    fn state_copies_baseline_fields() {
        let state = StationState::from_baseline(&baseline(), 4);
        assert_eq!(state.id, "blr-1");
        assert_eq!(state.queue_length, 4);
        assert_eq!(state.reliability, 0.93);
        assert_eq!(state.location(), GeoPoint::new(12.9352, 77.6245));
    }

    #[test]
    fn queue_clamp_respects_both_bounds() {
        let p = DynamicsParams::default();
        assert_eq!(p.clamp_queue(0, -1), 0);
        assert_eq!(p.clamp_queue(12, 1), 12);
        assert_eq!(p.clamp_queue(5, 1), 6);
        assert_eq!(p.clamp_queue(5, -1), 4);
    }

    #[test]
    fn reliability_clamp_respects_both_bounds() {
        let p = DynamicsParams::default();
        assert_eq!(p.clamp_reliability(0.5), 0.75);
        assert_eq!(p.clamp_reliability(1.2), 0.99);
        assert_eq!(p.clamp_reliability(0.9), 0.9);
    }
}
