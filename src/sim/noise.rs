//! Phase-seeded noise for the station dynamics.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Noise draws for one station in one advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationNoise {
    /// Integer queue drift in `{-1, 0, +1}`.
    pub queue_drift: i64,
    /// Uniform sample in `[0, 1)` used for reliability jitter.
    pub jitter_unit: f64,
}

impl StationNoise {
    /// Derives noise for the given phase seed.
    ///
    /// Deterministic for a given `seed`: the same phase always produces the
    /// same draws. Not suitable for anything beyond simulation.
    pub fn from_phase(seed: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed.to_bits());
        let drift_unit: f64 = rng.random();
        let jitter_unit: f64 = rng.random();

        // (u - 0.5) * 2 lies in [-1, 1); rounding gives -1, 0 or +1.
        let queue_drift = ((drift_unit - 0.5) * 2.0).round() as i64;

        Self {
            queue_drift,
            jitter_unit,
        }
    }

    /// Reliability jitter scaled to `[-half_width, half_width)`.
    pub fn jitter(&self, half_width: f64) -> f64 {
        (self.jitter_unit - 0.5) * 2.0 * half_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_phase_gives_same_noise() {
        assert_eq!(StationNoise::from_phase(2.5), StationNoise::from_phase(2.5));
    }

    #[test]
    fn drift_and_jitter_stay_in_range() {
        let mut seen = [false; 3];
        for i in 0..2_000 {
            let noise = StationNoise::from_phase(i as f64 * 0.173);
            assert!((-1..=1).contains(&noise.queue_drift));
            seen[(noise.queue_drift + 1) as usize] = true;

            let j = noise.jitter(0.005);
            assert!((-0.005..0.005).contains(&j), "jitter {j}");
        }
        assert_eq!(seen, [true, true, true], "all drift values should occur");
    }
}
