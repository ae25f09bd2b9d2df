/// Wall-clock throttle and drift phase.
pub mod clock;
/// Phase-seeded noise draws.
pub mod noise;
/// The station fleet simulator.
pub mod simulator;
pub mod types;

pub use simulator::StationSimulator;
pub use types::{DynamicsParams, StationBaseline, StationState};
