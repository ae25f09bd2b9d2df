//! Process-wide station fleet with throttled, wall-clock driven dynamics.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, ScenarioConfig};
use crate::error::StationError;

use super::clock::SimulatorClock;
use super::noise::StationNoise;
use super::types::{DynamicsParams, StationBaseline, StationState};

/// Mutable half of the simulator, guarded by a single lock.
#[derive(Debug)]
struct Fleet {
    clock: SimulatorClock,
    stations: Vec<StationState>,
}

/// Owns the live station collection and advances it on every read.
///
/// Construct once at startup and share by reference (or `Arc`). All public
/// operations take one internal lock for the full advance-then-read, so
/// concurrent callers never observe a partially advanced fleet and never
/// lose an update. Callers only ever receive cloned snapshots.
///
/// Baselines are immutable after construction; `baselines[i]` anchors
/// `stations[i]`.
#[derive(Debug)]
pub struct StationSimulator {
    params: DynamicsParams,
    baselines: Vec<StationBaseline>,
    fleet: Mutex<Fleet>,
}

impl StationSimulator {
    /// Creates a simulator from a roster of baselines and initial queue lengths.
    ///
    /// Initial queues and reliabilities are clamped into the bounds of
    /// `params`; initial reliability equals the baseline reliability.
    ///
    /// # Arguments
    ///
    /// * `roster` - `(baseline, initial_queue)` per station, in display order
    /// * `params` - Dynamics parameters
    /// * `clock` - Initial clock state
    ///
    /// # Panics
    ///
    /// Panics if two baselines share an id.
    pub fn new(
        roster: Vec<(StationBaseline, u32)>,
        params: DynamicsParams,
        clock: SimulatorClock,
    ) -> Self {
        {
            let mut seen = HashSet::with_capacity(roster.len());
            for (baseline, _) in &roster {
                assert!(
                    seen.insert(baseline.id.as_str()),
                    "duplicate station id \"{}\"",
                    baseline.id
                );
            }
        }

        let stations = roster
            .iter()
            .map(|(baseline, queue)| {
                let mut state = StationState::from_baseline(baseline, *queue);
                state.queue_length = params.clamp_queue(state.queue_length, 0);
                state.reliability = params.clamp_reliability(state.reliability);
                state
            })
            .collect();
        let baselines = roster.into_iter().map(|(baseline, _)| baseline).collect();

        Self {
            params,
            baselines,
            fleet: Mutex::new(Fleet { clock, stations }),
        }
    }

    /// Builds the simulator described by a scenario.
    ///
    /// The scenario is validated first. The clock is anchored at `start`. The
    /// initial drift phase is drawn from `simulation.seed` when present,
    /// otherwise from the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns every violation reported by [`ScenarioConfig::validate`].
    pub fn from_config(cfg: &ScenarioConfig, start: Instant) -> Result<Self, Vec<ConfigError>> {
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let phase: f64 = match cfg.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed).random(),
            None => rand::rng().random(),
        };
        let roster = cfg
            .stations
            .iter()
            .map(|s| (s.baseline(), s.queue_length))
            .collect();

        Ok(Self::new(
            roster,
            cfg.simulation.dynamics(),
            SimulatorClock::new(start, phase),
        ))
    }

    /// Advances the fleet to the current instant and returns a snapshot of every station.
    pub fn list_stations(&self) -> Vec<StationState> {
        self.list_stations_at(Instant::now())
    }

    /// Advances the fleet to `now` and returns a snapshot of every station.
    pub fn list_stations_at(&self, now: Instant) -> Vec<StationState> {
        let mut fleet = self.lock();
        self.advance_locked(&mut fleet, now);
        fleet.stations.clone()
    }

    /// Advances the fleet to the current instant and returns one station.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::NotFound`] if no station has the given id.
    pub fn get_station(&self, id: &str) -> Result<StationState, StationError> {
        self.get_station_at(id, Instant::now())
    }

    /// Advances the fleet to `now` and returns one station.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::NotFound`] if no station has the given id.
    pub fn get_station_at(&self, id: &str, now: Instant) -> Result<StationState, StationError> {
        let mut fleet = self.lock();
        self.advance_locked(&mut fleet, now);
        fleet
            .stations
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| {
                warn!(station_id = id, "station lookup missed");
                StationError::NotFound(id.to_string())
            })
    }

    /// Advances the fleet to `now` without reading it.
    ///
    /// Returns `true` if the state moved, `false` if the call was throttled.
    pub fn advance_at(&self, now: Instant) -> bool {
        let mut fleet = self.lock();
        self.advance_locked(&mut fleet, now)
    }

    /// Current drift phase.
    pub fn drift_phase(&self) -> f64 {
        self.lock().clock.drift_phase()
    }

    /// Station ids in roster order. Does not advance the fleet.
    pub fn station_ids(&self) -> Vec<String> {
        self.baselines.iter().map(|b| b.id.clone()).collect()
    }

    /// Immutable baselines in roster order.
    pub fn baselines(&self) -> &[StationBaseline] {
        &self.baselines
    }

    /// Dynamics parameters in use.
    pub fn params(&self) -> &DynamicsParams {
        &self.params
    }

    /// Number of stations in the fleet.
    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    /// Whether the fleet has no stations.
    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Fleet> {
        // Every mutation is clamped before it is stored, so state behind a
        // poisoned lock still satisfies the fleet invariants.
        self.fleet.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn advance_locked(&self, fleet: &mut Fleet, now: Instant) -> bool {
        let p = &self.params;
        let Some(elapsed) = fleet
            .clock
            .try_advance(now, p.throttle_secs, p.phase_divisor_secs)
        else {
            trace!("station dynamics throttled");
            return false;
        };

        let phase = fleet.clock.drift_phase();
        for (idx, (state, baseline)) in fleet.stations.iter_mut().zip(&self.baselines).enumerate() {
            let noise = StationNoise::from_phase(phase + idx as f64 * p.station_phase_offset);
            step_station(state, baseline, noise, p);
        }

        debug!(
            elapsed_secs = elapsed,
            drift_phase = phase,
            stations = fleet.stations.len(),
            "advanced station dynamics"
        );
        true
    }
}

/// Applies one advance to a single station: queue random walk plus
/// reliability mean reversion with jitter, both clamped.
pub(crate) fn step_station(
    state: &mut StationState,
    baseline: &StationBaseline,
    noise: StationNoise,
    params: &DynamicsParams,
) {
    state.queue_length = params.clamp_queue(state.queue_length, noise.queue_drift);

    let toward_base = baseline.baseline_reliability - state.reliability;
    let next = state.reliability
        + toward_base * params.reversion_rate
        + noise.jitter(params.reliability_jitter);
    state.reliability = params.clamp_reliability(next);
}
