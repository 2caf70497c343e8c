//! Request pacing shared by the HTTP clients.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default minimum interval between TMDB requests (~40 req/s).
pub(crate) const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Enforces a minimum interval between consecutive requests.
///
/// Callers share one pacer through `&self`; the slot reservation is
/// serialized by an internal lock so concurrent callers queue up instead of
/// bursting.
#[derive(Debug)]
pub(crate) struct Pacer {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Time the previous request was released.
    last_release: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Creates a pacer with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_release: Mutex::const_new(None),
        }
    }

    /// Waits until the next request may be sent.
    pub(crate) async fn wait(&self) {
        let mut last = self.last_release.lock().await;

        if let Some(prev) = *last {
            let ready_at = prev.checked_add(self.min_interval).unwrap_or(prev);
            if Instant::now() < ready_at {
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
