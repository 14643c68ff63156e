//! Randomized blink scheduling.
//!
//! The scheduler waits a uniformly random interval, then decides whether the
//! next blink is a double blink. The decision is published on a `watch`
//! channel that the render tick reads every frame.

use crate::{config::BlinkConfig, scope::ShutdownSignal};
use log::{debug, info};
use rand::Rng;
use std::time::Duration;
use tokio::sync::watch;

/// Blink timing and double-blink probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkScheduler {
    min_interval: Duration,
    max_interval: Duration,
    probability: f64,
}

impl BlinkScheduler {
    /// Create a scheduler; the interval bounds are swapped if reversed
    #[must_use]
    pub fn new(min_interval: Duration, max_interval: Duration, probability: f64) -> Self {
        let (min_interval, max_interval) = if min_interval <= max_interval {
            (min_interval, max_interval)
        } else {
            (max_interval, min_interval)
        };
        Self {
            min_interval,
            max_interval,
            probability: probability.clamp(0.0, 1.0),
        }
    }

    /// Create a scheduler from configuration
    #[must_use]
    pub fn from_config(config: &BlinkConfig) -> Self {
        let (min, max) = config.interval_range();
        Self::new(min, max, config.double_blink_probability)
    }

    /// Double-blink probability
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    /// Uniform wait in `[min_interval, max_interval]`, millisecond resolution
    pub fn next_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = u64::try_from(self.min_interval.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.max_interval.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rng.gen_range(min..=max))
    }

    /// Draw one sample in `[0, 1)` and compare it against the probability
    pub fn decide<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.probability
    }

    /// Run until `shutdown` fires, publishing each decision on `flag`.
    ///
    /// On cancellation the flag keeps its last published value.
    pub async fn run<R: Rng + Send>(self, mut rng: R, flag: watch::Sender<bool>, mut shutdown: ShutdownSignal) {
        info!(
            "Blink scheduler running ({:?}..={:?}, p={})",
            self.min_interval, self.max_interval, self.probability
        );
        loop {
            let wait = self.next_interval(&mut rng);
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(wait) => {}
            }

            let double = self.decide(&mut rng);
            debug!("Blink decision after {:?}: double={}", wait, double);
            flag.send_replace(double);
        }
        debug!("Blink scheduler stopped");
    }
}

impl Default for BlinkScheduler {
    fn default() -> Self {
        Self::from_config(&BlinkConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_interval_within_bounds() {
        let scheduler = BlinkScheduler::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let interval = scheduler.next_interval(&mut rng);
            assert!(interval >= Duration::from_millis(500));
            assert!(interval <= Duration::from_millis(5000));
        }
    }

    #[test]
    fn test_double_blink_rate_converges() {
        let scheduler = BlinkScheduler::default();
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 20_000;
        let doubles = (0..draws).filter(|_| scheduler.decide(&mut rng)).count();
        let rate = doubles as f64 / f64::from(draws);
        assert!((rate - 0.25).abs() < 0.02, "rate was {rate}");
    }

    #[test]
    fn test_bounds_are_normalized() {
        let scheduler = BlinkScheduler::new(Duration::from_millis(900), Duration::from_millis(100), 2.0);
        assert_eq!(scheduler.probability(), 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let interval = scheduler.next_interval(&mut rng);
        assert!(interval >= Duration::from_millis(100) && interval <= Duration::from_millis(900));
        assert!(scheduler.decide(&mut rng));
    }

    #[test]
    fn test_zero_probability_never_blinks_twice() {
        let scheduler = BlinkScheduler::new(Duration::from_millis(1), Duration::from_millis(1), 0.0);
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..1000).all(|_| !scheduler.decide(&mut rng)));
    }
}
