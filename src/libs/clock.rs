//! Wall-clock time source for the session timer.
//!
//! Elapsed time is always derived from timestamps, never from counting
//! tick callbacks, so a delayed or skipped tick (suspended process,
//! backgrounded terminal) can never lose or double-count seconds. The
//! [`Clock`] trait exists so tests can drive the timer with explicit
//! timestamps.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Whole seconds between `start` and `now`, clamped to zero when the
/// clock moved backwards.
pub fn seconds_between(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    now.signed_duration_since(start).num_seconds().max(0) as u64
}
