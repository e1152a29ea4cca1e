use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Spaces out requests to the same domain.
///
/// Each caller reserves the next free slot for its domain and sleeps until
/// then, so concurrent fetches of one site go out `min_delay` apart while
/// different sites do not wait on each other.
#[derive(Debug)]
pub(crate) struct DomainThrottle {
    next_slot: Mutex<HashMap<String, Instant>>,
    min_delay: Duration,
}

impl DomainThrottle {
    pub(crate) fn new(min_delay_ms: u64) -> Self {
        Self {
            next_slot: Mutex::new(HashMap::new()),
            min_delay: Duration::from_millis(min_delay_ms),
        }
    }

    /// Reserve a slot for `domain`, returning how long the caller must wait.
    async fn reserve(&self, domain: &str) -> Duration {
        let now = Instant::now();
        let mut slots = self.next_slot.lock().await;
        let slot = slots.get(domain).map_or(now, |next| (*next).max(now));
        slots.insert(domain.to_string(), slot + self.min_delay);
        slot - now
    }

    pub(crate) async fn wait_turn(&self, domain: &str) {
        let wait = self.reserve(domain).await;
        if !wait.is_zero() {
            tracing::trace!("Waiting {:?} before next request to {}", wait, domain);
            tokio::time::sleep(wait).await;
        }
    }
}
