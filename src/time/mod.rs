//! Wall-clock sources for token issuance and verification.
//!
//! Token logic never reads the system time directly; it asks a [`Clock`],
//! which keeps expiry behaviour testable with fixed instants.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::TimestampMillis;

pub trait Clock: Send + Sync {
    /// Current Unix time in milliseconds.
    fn now_millis(&self) -> TimestampMillis;
}

/// Reads the operating system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> TimestampMillis {
        // A clock set before 1970 reads as the epoch; tokens then look issued
        // in the future and are rejected.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// A manually driven clock.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    pub fn new(now: TimestampMillis) -> Self {
        FixedClock(AtomicU64::new(now))
    }

    pub fn set(&self, now: TimestampMillis) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> TimestampMillis {
        self.0.load(Ordering::SeqCst)
    }
}
