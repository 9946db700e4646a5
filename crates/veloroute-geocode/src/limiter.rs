//! Strict minimum-interval rate limiting for the geocoding provider.
//!
//! The provider allows roughly one request per second. Every geocode call in
//! the process must go through one shared [`RateLimiter`], which serializes
//! callers and spaces consecutive requests at least `min_interval` apart.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serializes calls so that no two of them start less than `min_interval`
/// apart. Clone-free; share it behind an `Arc`.
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Waits until the minimum interval since the previous permit has
    /// elapsed, then records this call as the new reference point.
    ///
    /// Holding the internal lock across the sleep is what makes the limiter
    /// strict: a second caller cannot slip in between the wait and the
    /// timestamp update.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}
