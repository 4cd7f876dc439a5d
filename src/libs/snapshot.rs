//! Timer snapshots for surviving restarts and in-process "navigation".
//!
//! The state machine is serialized as a versioned, schema-validated
//! record: a future shape change bumps `SNAPSHOT_VERSION` and obsolete
//! snapshots are discarded cleanly instead of being half-parsed field
//! by field. Restoration always fails soft: corrupt, stale or
//! mismatched data reads as "no snapshot", never an error, because a
//! broken restore must not keep the timer from starting.

use crate::libs::timer::{TimerMode, TimerState};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const SNAPSHOT_VERSION: u32 = 1;
pub const SNAPSHOT_KEY: &str = "timer_snapshot";
/// Durable snapshots older than this are discarded on restore.
pub const MAX_SNAPSHOT_AGE_HOURS: i64 = 24;

/// Key→string storage surviving process restarts. Write failures are
/// reported so callers can log them, but restoration treats every
/// failure as an absent snapshot.
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Ephemeral key→string handoff between the timer screen and the
/// guided-activity flows within one process run; the in-process
/// equivalent of a navigation-scoped store.
#[derive(Default)]
pub struct MemoryHandoff {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: &str, value: String) {
        self.map.lock().insert(key.to_string(), value);
    }

    /// Removes and returns the stashed value; handoffs are single-use.
    pub fn take(&self, key: &str) -> Option<String> {
        self.map.lock().remove(key)
    }
}

/// Serialized form of [`TimerState`] plus the save timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub version: u32,
    pub mode: TimerMode,
    pub segment_start: Option<DateTime<Utc>>,
    pub accumulated_secs: u64,
    pub overuse_secs: u64,
    pub last_prompt_secs: u64,
    pub saved_at: DateTime<Utc>,
}

impl TimerSnapshot {
    pub fn capture(state: &TimerState, now: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            mode: state.mode,
            segment_start: state.segment_start,
            accumulated_secs: state.accumulated_secs,
            overuse_secs: state.overuse_secs,
            last_prompt_secs: state.last_prompt_secs,
            saved_at: now,
        }
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a raw snapshot; anything malformed reads as absent.
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                debug!(error = %err, "snapshot discarded: parse failure");
                None
            }
        }
    }

    /// Rebuilds the timer state, or `None` when the snapshot is from
    /// another schema version, idle, or too old. A Running snapshot
    /// keeps its original `segment_start`: the elapsed total is
    /// recomputed from timestamps, never approximated from the save
    /// time, so time spent unloaded is accounted exactly. The caller
    /// must re-run the threshold check immediately after restoring.
    pub fn restore(self, now: DateTime<Utc>, max_age: Duration) -> Option<TimerState> {
        if self.version != SNAPSHOT_VERSION {
            debug!(version = self.version, "snapshot discarded: version mismatch");
            return None;
        }
        if self.mode == TimerMode::Idle {
            return None;
        }
        if now.signed_duration_since(self.saved_at) > max_age {
            debug!("snapshot discarded: older than restore window");
            return None;
        }
        // Re-establish the mode/segment invariant; a snapshot violating
        // it is corrupt.
        match (self.mode, self.segment_start) {
            (TimerMode::Running, None) | (TimerMode::Paused, Some(_)) => {
                debug!("snapshot discarded: mode/segment mismatch");
                return None;
            }
            _ => {}
        }
        Some(TimerState {
            mode: self.mode,
            segment_start: self.segment_start,
            accumulated_secs: self.accumulated_secs,
            overuse_secs: self.overuse_secs,
            last_prompt_secs: self.last_prompt_secs,
        })
    }

    /// Default restore window for durable snapshots.
    pub fn max_age() -> Duration {
        Duration::hours(MAX_SNAPSHOT_AGE_HOURS)
    }
}
