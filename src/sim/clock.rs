use std::time::Instant;

/// Wall-clock bookkeeping for the station simulator.
///
/// Tracks when the fleet was last advanced and the accumulated drift phase.
/// The phase only ever grows, by `elapsed / phase_divisor_secs` per advance.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use swap_locator::sim::clock::SimulatorClock;
///
/// let start = Instant::now();
/// let mut clock = SimulatorClock::new(start, 0.0);
///
/// assert_eq!(clock.try_advance(start + Duration::from_secs(1), 2.0, 13.0), None);
/// assert_eq!(clock.try_advance(start + Duration::from_secs(13), 2.0, 13.0), Some(13.0));
/// assert_eq!(clock.drift_phase(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatorClock {
    /// Instant of the most recent advance (or construction)
    last_advance: Instant,
    /// Monotonically increasing phase feeding the noise generator
    drift_phase: f64,
}

impl SimulatorClock {
    /// Creates a clock anchored at `start` with the given initial phase.
    pub fn new(start: Instant, drift_phase: f64) -> Self {
        Self {
            last_advance: start,
            drift_phase,
        }
    }

    /// Advances the clock to `now` unless the throttle interval has not elapsed.
    ///
    /// # Arguments
    ///
    /// * `now` - Current instant
    /// * `throttle_secs` - Minimum seconds between advances
    /// * `phase_divisor_secs` - Wall-clock seconds per unit of phase
    ///
    /// # Returns
    ///
    /// * `Some(elapsed)` - Seconds since the previous advance; the clock moved
    /// * `None` - Throttled; the clock is unchanged
    pub fn try_advance(
        &mut self,
        now: Instant,
        throttle_secs: f64,
        phase_divisor_secs: f64,
    ) -> Option<f64> {
        // `saturating_duration_since` maps an earlier `now` to zero elapsed.
        let elapsed = now.saturating_duration_since(self.last_advance).as_secs_f64();
        if elapsed < throttle_secs {
            return None;
        }

        self.last_advance = now;
        self.drift_phase += elapsed / phase_divisor_secs;
        Some(elapsed)
    }

    /// Current drift phase.
    pub fn drift_phase(&self) -> f64 {
        self.drift_phase
    }

    /// Instant of the most recent advance.
    pub fn last_advance(&self) -> Instant {
        self.last_advance
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_new_clock() {
        let start = Instant::now();
        let clock = SimulatorClock::new(start, 0.25);
        assert_eq!(clock.last_advance(), start);
        assert_eq!(clock.drift_phase(), 0.25);
    }

    #[test]
    fn test_throttled_advance_leaves_clock_untouched() {
        let start = Instant::now();
        let mut clock = SimulatorClock::new(start, 0.0);

        let later = start + Duration::from_millis(1999);
        assert_eq!(clock.try_advance(later, 2.0, 13.0), None);
        assert_eq!(clock.last_advance(), start);
        assert_eq!(clock.drift_phase(), 0.0);
    }

    #[test]
    fn test_advance_accumulates_phase() {
        let start = Instant::now();
        let mut clock = SimulatorClock::new(start, 1.0);

        let t1 = start + Duration::from_secs(26);
        assert_eq!(clock.try_advance(t1, 2.0, 13.0), Some(26.0));
        assert_eq!(clock.drift_phase(), 3.0);
        assert_eq!(clock.last_advance(), t1);

        // Throttle is measured from the last advance, not from construction.
        let t2 = t1 + Duration::from_secs(1);
        assert_eq!(clock.try_advance(t2, 2.0, 13.0), None);
    }

    #[test]
    fn test_earlier_instant_is_throttled() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut clock = SimulatorClock::new(start, 0.0);
        assert_eq!(clock.try_advance(Instant::now(), 2.0, 13.0), None);
    }

    #[test]
    fn test_exact_throttle_interval_advances() {
        let start = Instant::now();
        let mut clock = SimulatorClock::new(start, 0.0);
        assert!(clock.try_advance(start + Duration::from_secs(2), 2.0, 13.0).is_some());
    }
}
