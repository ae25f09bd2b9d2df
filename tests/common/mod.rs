//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::time::Instant;

use swap_locator::config::ScenarioConfig;
use swap_locator::geo::GeoPoint;
use swap_locator::sim::StationSimulator;

/// Central Bengaluru, the demo rider position.
pub fn bengaluru_origin() -> GeoPoint {
    GeoPoint::new(12.9716, 77.5946)
}

/// Full eleven-station roster with a fixed drift seed.
pub fn seeded_india() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::india();
    cfg.simulation.seed = Some(42);
    cfg
}

/// Simulator over the seeded india roster, anchored at `start`.
pub fn india_simulator(start: Instant) -> StationSimulator {
    StationSimulator::from_config(&seeded_india(), start).unwrap()
}
