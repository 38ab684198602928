use std::{ops::RangeInclusive, time::Duration};

use rand::Rng;

use roadbook_directions::provider::TravelMode;

use crate::progress::DEFAULT_PROGRESS_TICKS;

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Bounds for the randomized initial inter-request delay.
pub const INITIAL_DELAY_MS: RangeInclusive<u64> = 50..=150;

/// Floor for explicit initial delays. The backoff multiplies the delay,
/// and zero stays zero.
pub const MIN_INITIAL_DELAY: Duration = Duration::from_millis(1);

/// How the inter-request delay reacts to rate limiting.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Wait applied before every request. Randomized within
    /// `INITIAL_DELAY_MS` when not set, raised to `MIN_INITIAL_DELAY`
    /// otherwise.
    pub initial_delay: Option<Duration>,

    /// Multiplier applied to the delay on each consecutive rate limit.
    pub growth_factor: f64,

    /// Restore the initial delay after a successful segment instead of
    /// keeping the grown one.
    pub reset_on_success: bool,

    /// Give up after this many consecutive rate-limited attempts at the
    /// same segment. Unbounded when not set.
    pub max_consecutive_retries: Option<u32>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: None,
            growth_factor: 2.0,
            reset_on_success: false,
            max_consecutive_retries: None,
        }
    }
}

impl BackoffPolicy {
    pub(crate) fn starting_delay(&self) -> Duration {
        self.initial_delay
            .unwrap_or_else(|| Duration::from_millis(rand::rng().random_range(INITIAL_DELAY_MS)))
            .max(MIN_INITIAL_DELAY)
    }
}

#[derive(Debug, Clone)]
pub struct DriveParams {
    pub batch_size: usize,
    pub mode: TravelMode,
    pub progress_ticks: usize,
    pub backoff: BackoffPolicy,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            mode: TravelMode::Driving,
            progress_ticks: DEFAULT_PROGRESS_TICKS,
            backoff: BackoffPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_randomized_starting_delay_stays_in_bounds() {
        let policy = BackoffPolicy::default();

        for _ in 0..50 {
            let delay = policy.starting_delay();
            assert!(INITIAL_DELAY_MS.contains(&(delay.as_millis() as u64)));
        }
    }

    #[test]
    fn test_fixed_starting_delay() {
        let policy = BackoffPolicy {
            initial_delay: Some(Duration::from_millis(75)),
            ..BackoffPolicy::default()
        };

        assert_eq!(policy.starting_delay(), Duration::from_millis(75));
    }

    #[test]
    fn test_zero_delay_is_floored() {
        let policy = BackoffPolicy {
            initial_delay: Some(Duration::ZERO),
            ..BackoffPolicy::default()
        };

        let delay = policy.starting_delay();

        assert_eq!(delay, MIN_INITIAL_DELAY);
        assert!(delay.mul_f64(policy.growth_factor) > delay);
    }
}
