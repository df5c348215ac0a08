//! Clock abstraction
//!
//! The controller never reads the system clock directly so that timer
//! behavior (auto-hide, progress heartbeat, indicators) can be driven
//! deterministically from tests.

use chrono::{DateTime, Utc};
use std::time::Instant;

/// Trait for providing time in tests and production
pub trait TimeProvider: Send + Sync + 'static {
    /// Get the current instant
    fn now(&self) -> Instant;

    /// Get the current UTC datetime
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Production time provider that uses real system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
