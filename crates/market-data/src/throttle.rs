//! Token bucket throttle for upstream requests.
//!
//! FMP enforces a per-minute rate limit, and bulk symbol updates issue many
//! chunked requests back to back. The throttle combines a token bucket (for
//! the per-minute budget) with a minimum delay between consecutive requests.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Default budget: 250 requests per minute (FMP starter plan).
const DEFAULT_REQUESTS_PER_MINUTE: f64 = 250.0;

/// Default burst capacity.
const DEFAULT_BUCKET_CAPACITY: f64 = 10.0;

/// Default minimum spacing between consecutive requests.
const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_update: Instant,
    last_request: Option<Instant>,
}

/// Throttle shared by all calls against a single upstream provider.
///
/// Thread-safe; waiting happens outside the lock so concurrent callers do not
/// serialize on the mutex while sleeping.
pub struct Throttle {
    state: Mutex<BucketState>,
    /// Token refill rate in tokens per second.
    rate: f64,
    capacity: f64,
    min_delay: Duration,
}

impl Throttle {
    pub fn new() -> Self {
        Self::with_config(
            DEFAULT_REQUESTS_PER_MINUTE as u32,
            DEFAULT_BUCKET_CAPACITY,
            DEFAULT_MIN_DELAY,
        )
    }

    pub fn with_config(requests_per_minute: u32, capacity: f64, min_delay: Duration) -> Self {
        Self {
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_update: Instant::now(),
                last_request: None,
            }),
            rate: requests_per_minute as f64 / 60.0,
            capacity,
            min_delay,
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, BucketState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("Throttle mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Computes how long the caller must wait, consuming a token if one is
    /// available now. Returns `Duration::ZERO` when the request may proceed
    /// immediately.
    fn reserve(&self) -> Duration {
        let mut state = self.lock_state();
        let now = Instant::now();

        let elapsed = now.duration_since(state.last_update).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
        state.last_update = now;

        let spacing_wait = match state.last_request {
            Some(last) => self.min_delay.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        };

        if state.tokens >= 1.0 && spacing_wait.is_zero() {
            state.tokens -= 1.0;
            state.last_request = Some(now);
            return Duration::ZERO;
        }

        let token_wait = if state.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - state.tokens) / self.rate)
        };

        spacing_wait.max(token_wait)
    }

    /// Waits until a request slot is available.
    pub async fn acquire(&self) {
        loop {
            let wait = self.reserve();
            if wait.is_zero() {
                return;
            }
            debug!("Throttle: waiting {:?} before next upstream request", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Tries to acquire a slot without waiting.
    pub fn try_acquire(&self) -> bool {
        self.reserve().is_zero()
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_up_to_capacity() {
        let throttle = Throttle::with_config(600, 3.0, Duration::ZERO);

        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn test_min_delay_spacing() {
        let throttle = Throttle::with_config(6000, 10.0, Duration::from_millis(50));

        assert!(throttle.try_acquire());
        // Immediately after, spacing blocks even though tokens remain.
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn test_refill_after_elapsed_time() {
        let throttle = Throttle::with_config(60, 1.0, Duration::ZERO);

        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());

        {
            let mut state = throttle.lock_state();
            state.last_update = Instant::now() - Duration::from_secs(2);
            state.last_request = None;
        }

        assert!(throttle.try_acquire());
    }

    #[tokio::test]
    async fn test_async_acquire_waits_and_completes() {
        let throttle = Throttle::with_config(6000, 1.0, Duration::from_millis(10));

        throttle.acquire().await;
        let start = Instant::now();
        throttle.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
