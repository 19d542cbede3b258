use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::{ACTIVE_MAX, ACTIVE_MIN};

/// Shortest and longest time a bar takes to travel between its targets
const CYCLE_MIN: Duration = Duration::from_millis(500);
const CYCLE_MAX: Duration = Duration::from_millis(1000);

/// Time for bars to fall back to the floor once deactivated
const SETTLE: Duration = Duration::from_millis(300);

/// Motion of one bar while active
///
/// The bar eases from where it was to `first`, then ping-pongs between
/// `first` and `second`, each leg taking `leg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarCycle {
    pub start: f32,
    pub first: f32,
    pub second: f32,
    pub leg: Duration,
}

impl BarCycle {
    fn random<R: Rng + ?Sized>(start: f32, rng: &mut R) -> Self {
        let leg_ms = rng.random_range(CYCLE_MIN.as_millis() as u64..=CYCLE_MAX.as_millis() as u64);

        Self {
            start,
            first: rng.random_range(ACTIVE_MIN..=ACTIVE_MAX),
            second: rng.random_range(ACTIVE_MIN..=ACTIVE_MAX),
            leg: Duration::from_millis(leg_ms),
        }
    }

    /// Magnitude `elapsed` after the cycle began
    pub fn value_at(&self, elapsed: Duration) -> f32 {
        let t = elapsed.as_secs_f32() / self.leg.as_secs_f32();

        if t < 1.0 {
            return lerp(self.start, self.first, ease_in_out(t));
        }

        let t = t - 1.0;
        let frac = t.fract();
        let (from, to) = if (t.floor() as u64) % 2 == 0 {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        };

        lerp(from, to, ease_in_out(frac))
    }
}

enum Phase {
    Active { since: Duration, cycles: Vec<BarCycle> },
    Settling { since: Duration, from: Vec<f32> },
}

/// Animated bar magnitudes for a fixed number of bars
///
/// Time is passed in by the caller as an offset from any fixed origin,
/// which keeps sampling a pure function of `(state, now)`.
pub struct WaveformSampler {
    bar_count: usize,
    floor: f32,
    rng: StdRng,
    phase: Phase,
}

impl WaveformSampler {
    pub fn new(bar_count: usize, floor: f32) -> Self {
        Self::with_rng(bar_count, floor, StdRng::from_os_rng())
    }

    /// Deterministic sampler for tests and replays
    pub fn with_seed(bar_count: usize, floor: f32, seed: u64) -> Self {
        Self::with_rng(bar_count, floor, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bar_count: usize, floor: f32, rng: StdRng) -> Self {
        let floor = floor.clamp(0.0, 1.0);

        Self {
            bar_count,
            floor,
            rng,
            phase: Phase::Settling {
                since: Duration::ZERO,
                from: vec![floor; bar_count],
            },
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    /// Switch between animating and settling at time `now`
    ///
    /// Every bar continues from its current height, so there is no jump.
    /// Activating draws fresh random targets and leg durations.
    pub fn set_active(&mut self, active: bool, now: Duration) {
        if active == self.is_active() {
            return;
        }

        let current = self.sample(now);

        self.phase = if active {
            let cycles = current
                .into_iter()
                .map(|start| BarCycle::random(start, &mut self.rng))
                .collect();
            Phase::Active { since: now, cycles }
        } else {
            Phase::Settling {
                since: now,
                from: current,
            }
        };
    }

    /// Bar magnitudes at time `now`, each within `0.0..=1.0`
    pub fn sample(&self, now: Duration) -> Vec<f32> {
        match &self.phase {
            Phase::Active { since, cycles } => {
                let elapsed = now.saturating_sub(*since);
                cycles
                    .iter()
                    .map(|cycle| cycle.value_at(elapsed).clamp(0.0, 1.0))
                    .collect()
            }
            Phase::Settling { since, from } => {
                let elapsed = now.saturating_sub(*since);
                let t = (elapsed.as_secs_f32() / SETTLE.as_secs_f32()).min(1.0);
                from.iter()
                    .map(|&v| lerp(v, self.floor, ease_in_out(t)).clamp(0.0, 1.0))
                    .collect()
            }
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_sampler_sits_at_floor() {
        let sampler = WaveformSampler::with_seed(7, 0.1, 1);

        assert!(!sampler.is_active());
        assert_eq!(sampler.sample(Duration::from_secs(5)), vec![0.1; 7]);
    }

    #[test]
    fn test_active_bars_stay_in_bounds() {
        let mut sampler = WaveformSampler::with_seed(25, 0.1, 42);
        sampler.set_active(true, Duration::ZERO);

        for ms in (0..10_000).step_by(37) {
            let bars = sampler.sample(Duration::from_millis(ms));
            assert_eq!(bars.len(), 25);
            assert!(bars.iter().all(|b| (0.0..=1.0).contains(b)));
        }
    }

    #[test]
    fn test_active_bars_reach_random_targets() {
        let mut sampler = WaveformSampler::with_seed(7, 0.1, 3);
        sampler.set_active(true, Duration::ZERO);

        // After the longest possible first leg every bar is in the active range
        let bars = sampler.sample(CYCLE_MAX);
        assert!(bars.iter().all(|b| (ACTIVE_MIN - 1e-6..=ACTIVE_MAX).contains(b)));
    }

    #[test]
    fn test_deactivation_settles_to_floor() {
        let mut sampler = WaveformSampler::with_seed(7, 0.1, 9);
        sampler.set_active(true, Duration::ZERO);
        sampler.set_active(false, Duration::from_millis(1200));

        assert!(!sampler.is_active());
        let settled = sampler.sample(Duration::from_millis(1200) + SETTLE);
        assert!(settled.iter().all(|&b| (b - 0.1).abs() < 1e-6));
    }

    #[test]
    fn test_same_seed_same_waveform() {
        let mut a = WaveformSampler::with_seed(20, 0.1, 11);
        let mut b = WaveformSampler::with_seed(20, 0.1, 11);
        a.set_active(true, Duration::ZERO);
        b.set_active(true, Duration::ZERO);

        assert_eq!(a.sample(Duration::from_millis(750)), b.sample(Duration::from_millis(750)));
    }

    #[test]
    fn test_bar_cycle_ping_pongs() {
        let cycle = BarCycle {
            start: 0.1,
            first: 0.4,
            second: 0.8,
            leg: Duration::from_millis(500),
        };

        assert!((cycle.value_at(Duration::ZERO) - 0.1).abs() < 1e-6);
        assert!((cycle.value_at(Duration::from_millis(500)) - 0.4).abs() < 1e-6);
        assert!((cycle.value_at(Duration::from_millis(1000)) - 0.8).abs() < 1e-6);
        assert!((cycle.value_at(Duration::from_millis(1500)) - 0.4).abs() < 1e-6);
    }
}
