//! Fixed-interval spacing between model calls.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum spacing between successive calls.
///
/// Owns its own mutex-guarded last-call instant, so concurrent callers
/// queue behind the lock instead of racing on a shared timestamp. The
/// spacing is process-local only.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Waits until at least `min_interval` has passed since the previous
    /// acquisition, then stamps the current instant.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "spacing model call");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
