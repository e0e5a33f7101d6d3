//! Request pacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default spacing between requests (TMDB tolerates ~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Single-tier limiter that keeps consecutive requests at least
/// `min_interval` apart.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between two requests.
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_slot: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter with the given spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a limiter with the default spacing (25ms).
    pub(crate) const fn with_default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Sleeps until the next slot opens, then reserves the following one.
    pub async fn acquire(&mut self) {
        if let Some(slot) = self.next_slot {
            let now = Instant::now();
            if slot > now {
                tokio::time::sleep(slot.saturating_duration_since(now)).await;
            }
        }

        self.next_slot = Instant::now().checked_add(self.min_interval);
    }
}
