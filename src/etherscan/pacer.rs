//! Outbound call pacing.
//!
//! Etherscan enforces per-key call rates (roughly 5/s with a key, far less
//! without). Every outbound call first waits for its slot here, so bursts of
//! client traffic are spread out instead of being rejected upstream.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serializes outbound calls to at most one per `interval`.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    /// Earliest instant the next call may start.
    next_slot: Mutex<Instant>,
}

impl Pacer {
    /// Create a pacer. A zero interval disables pacing.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Wait until this caller may issue its call.
    ///
    /// Waiters are served in lock order; the lock is held while sleeping so
    /// slots are handed out one at a time.
    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }

        let mut next = self.next_slot.lock().await;
        let now = Instant::now();
        if *next > now {
            tokio::time::sleep_until(*next).await;
        }
        *next = Instant::now() + self.interval;
    }

    /// Configured spacing between calls.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let pacer = Pacer::new(Duration::ZERO);
        let start = std::time::Instant::now();
        for _ in 0..100 {
            pacer.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_calls_are_spaced() {
        let pacer = Arc::new(Pacer::new(Duration::from_millis(40)));
        let start = std::time::Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let p = pacer.clone();
            handles.push(tokio::spawn(async move { p.wait().await }));
        }
        for h in handles {
            h.await.unwrap();
        }

        // First call is immediate, the next two wait one interval each.
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
