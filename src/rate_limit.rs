//! Min-interval gate around remote calls.
//!
//! A [`Permit`] is held for the duration of one call. The next `acquire` waits
//! until `interval` has passed since the previous permit was released, so the
//! pause is the same no matter how long the call itself took.

use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_release: Mutex<Option<Instant>>,
}

/// Exclusive right to make one call. Dropping it starts the cool-down.
#[derive(Debug)]
pub struct Permit<'a> {
    last_release: MutexGuard<'a, Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_release: Mutex::new(None),
        }
    }

    /// Wait for the cool-down to expire and take the permit.
    ///
    /// Concurrent callers queue on the inner lock, so at most one permit exists.
    pub async fn acquire(&self) -> Permit<'_> {
        let guard = self.last_release.lock().await;
        if let Some(released) = *guard {
            let ready_at = released + self.interval;
            if ready_at > Instant::now() {
                debug!("Rate limiter: waiting {:?}", ready_at - Instant::now());
                sleep_until(ready_at).await;
            }
        }
        Permit {
            last_release: guard,
        }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        *self.last_release = Some(Instant::now());
    }
}
