//! Manual time provider for deterministic testing

use crate::infra::time::TimeProvider;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Clock that only moves when told to
#[derive(Clone, Debug)]
pub struct ManualTimeProvider {
    instant: Arc<Mutex<Instant>>,
    utc: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualTimeProvider {
    pub fn new() -> Self {
        Self {
            instant: Arc::new(Mutex::new(Instant::now())),
            utc: Arc::new(Mutex::new(Utc::now())),
        }
    }

    /// Create a manual time provider starting at a specific time
    pub fn new_at(start_time: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(Instant::now())),
            utc: Arc::new(Mutex::new(start_time)),
        }
    }

    /// Advance time by a duration
    pub fn advance(&self, duration: Duration) {
        *self.instant.lock() += duration;
        let mut utc = self.utc.lock();
        *utc += chrono::Duration::from_std(duration)
            .unwrap_or_else(|_| chrono::Duration::zero());
    }
}

impl Default for ManualTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now(&self) -> Instant {
        *self.instant.lock()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        *self.utc.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_both_clocks() {
        let clock = ManualTimeProvider::new();
        let start = clock.now();
        let start_utc = clock.utc_now();

        clock.advance(Duration::from_secs(10));

        assert_eq!(clock.now() - start, Duration::from_secs(10));
        assert_eq!((clock.utc_now() - start_utc).num_seconds(), 10);
    }

    #[test]
    fn clones_share_the_same_time() {
        let clock = ManualTimeProvider::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now(), other.now());
    }
}
