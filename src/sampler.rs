//! The sampling loop: drives a level source at a target cadence.
//!
//! The loop is single-threaded, synchronous, and blocking; the inter-sample
//! sleep is the only suspension point. The delay is a best-effort wall-clock
//! sleep of `1_000_000 / frequency` microseconds — the achieved cadence drifts
//! by the cost of the read-and-bookkeeping path plus OS scheduling jitter, and
//! no attempt is made to compensate for accumulated drift. This is a sampling
//! tool, not a hard real-time system.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::StopCondition;
use crate::gpio::LevelSource;

/// Drives a [`LevelSource`] at a target cadence under one stopping policy.
pub struct Sampler {
    pin: u32,
    frequency_hz: u32,
    interval: Duration,
}

impl Sampler {
    /// Build a sampler for `pin` at `frequency_hz`.
    ///
    /// Above 1 MHz the per-sample sleep truncates to zero and the loop
    /// free-runs at whatever rate the hardware read allows.
    pub fn new(pin: u32, frequency_hz: u32) -> Self {
        let interval = Duration::from_micros(u64::from(1_000_000 / frequency_hz.max(1)));
        Self {
            pin,
            frequency_hz,
            interval,
        }
    }

    /// Run to completion under `stop`, returning the time-ordered samples.
    pub fn run(&self, source: &impl LevelSource, stop: StopCondition) -> Vec<bool> {
        match stop {
            StopCondition::Count(count) => self.run_fixed_count(source, count),
            StopCondition::Duration(duration) => self.run_fixed_duration(source, duration),
        }
    }

    /// Take exactly `sample_size` samples.
    ///
    /// Each iteration reads one level, appends it, then sleeps for the
    /// inter-sample interval. The returned buffer always has length
    /// `sample_size`.
    pub fn run_fixed_count(&self, source: &impl LevelSource, sample_size: usize) -> Vec<bool> {
        debug!(pin = self.pin, sample_size, "starting fixed-count run");
        let mut samples = Vec::with_capacity(sample_size);
        for _ in 0..sample_size {
            samples.push(source.read_level(self.pin));
            thread::sleep(self.interval);
        }
        info!(samples = samples.len(), "fixed-count run complete");
        samples
    }

    /// Sample until `duration` of wall-clock time has elapsed.
    ///
    /// The elapsed time is checked at the top of each iteration; once it
    /// reaches `duration` the loop stops immediately without taking a further
    /// sample. The output length is not known in advance — the buffer grows as
    /// needed, with `frequency × duration` used only as a capacity hint (the
    /// achieved cadence is always at or below nominal, so a hard preallocation
    /// of that size could misjudge the real count).
    pub fn run_fixed_duration(&self, source: &impl LevelSource, duration: Duration) -> Vec<bool> {
        debug!(pin = self.pin, ?duration, "starting fixed-duration run");
        let hint = u64::from(self.frequency_hz).saturating_mul(duration.as_secs());
        let mut samples = Vec::with_capacity(hint as usize);

        let start = Instant::now();
        loop {
            if start.elapsed() >= duration {
                break;
            }
            samples.push(source.read_level(self.pin));
            thread::sleep(self.interval);
        }
        info!(samples = samples.len(), elapsed = ?start.elapsed(), "fixed-duration run complete");
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::StaticLevels;

    #[test]
    fn fixed_count_returns_exactly_the_requested_length() {
        let sampler = Sampler::new(3, 10_000);
        let samples = sampler.run_fixed_count(&StaticLevels(0), 25);
        assert_eq!(samples.len(), 25);
    }

    #[test]
    fn samples_reflect_the_pin_bit() {
        let sampler = Sampler::new(5, 10_000);
        let high = sampler.run_fixed_count(&StaticLevels(1 << 5), 4);
        assert_eq!(high, vec![true; 4]);

        let low = sampler.run_fixed_count(&StaticLevels(!(1u32 << 5)), 4);
        assert_eq!(low, vec![false; 4]);
    }

    #[test]
    fn fixed_duration_runs_for_at_least_the_requested_time() {
        let sampler = Sampler::new(1, 1_000);
        let duration = Duration::from_millis(30);

        let start = Instant::now();
        let samples = sampler.run_fixed_duration(&StaticLevels(u32::MAX), duration);
        let elapsed = start.elapsed();

        assert!(elapsed >= duration, "run ended early: {elapsed:?}");
        // One inter-sample interval plus generous scheduling jitter.
        assert!(
            elapsed < duration + Duration::from_millis(100),
            "run overshot: {elapsed:?}"
        );
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|&level| level));
    }

    #[test]
    fn stop_condition_dispatch() {
        let sampler = Sampler::new(2, 10_000);
        let samples = sampler.run(&StaticLevels(0b100), StopCondition::Count(7));
        assert_eq!(samples, vec![true; 7]);
    }
}
