//! Minimum-interval rate limiting for outbound provider requests.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Spaces grants at least `min_interval` apart, globally across all callers.
///
/// The last-grant timestamp stays locked across the sleep, so concurrent
/// callers queue up instead of racing on a stale timestamp. Waiting is an
/// async sleep and never blocks the runtime.
pub struct RateLimiter {
    min_interval: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_grant: Mutex::new(None),
        }
    }

    /// Wait until a slot is available, then claim it. Cannot fail, only delay.
    pub async fn await_slot(&self) {
        let mut last = self.last_grant.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_slot_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(10));
        let start = Instant::now();
        limiter.await_slot().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_concurrent_slots_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(30));
        let (a, b, c) = tokio::join!(
            async {
                limiter.await_slot().await;
                Instant::now()
            },
            async {
                limiter.await_slot().await;
                Instant::now()
            },
            async {
                limiter.await_slot().await;
                Instant::now()
            },
        );

        let mut grants = [a, b, c];
        grants.sort();
        for pair in grants.windows(2) {
            // a millisecond of slack for scheduling skew between the grant
            // and the caller reading the clock
            assert!(
                pair[1].duration_since(pair[0]) >= Duration::from_millis(29),
                "grants too close together: {:?}",
                pair[1].duration_since(pair[0])
            );
        }
    }

    #[tokio::test]
    async fn test_zero_interval_does_not_delay() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.await_slot().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
