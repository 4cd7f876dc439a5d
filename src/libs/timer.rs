//! Session timer state machine.
//!
//! Tracks active screen time across pauses and process suspensions.
//! The machine moves between `Idle`, `Running` and `Paused`; a running
//! segment is anchored to its start timestamp and only folded into
//! `accumulated_secs` on pause or reset, so elapsed time is exact no
//! matter how irregularly the caller ticks.
//!
//! Transitions are plain functions returning effect values (e.g.
//! [`SessionCommit`]); nothing in here knows about rendering, storage
//! or the network.

use crate::libs::clock::seconds_between;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    #[default]
    Idle,
    Running,
    Paused,
}

/// In-memory timer state. Invariant: `mode == Running` exactly when
/// `segment_start` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub mode: TimerMode,
    /// Start of the current unpaused segment; `None` while idle or paused.
    pub segment_start: Option<DateTime<Utc>>,
    /// Seconds from prior segments, excluding any running segment.
    pub accumulated_secs: u64,
    /// Seconds the user stayed active after having been prompted.
    pub overuse_secs: u64,
    /// Elapsed-seconds mark of the most recent break prompt (0 = none yet).
    pub last_prompt_secs: u64,
}

/// Result of a `start` call, distinguishing a fresh session from a
/// resume and from a redundant duplicate dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Resumed,
    AlreadyRunning,
}

/// Side effect emitted when a session ends: totals to fold into the
/// daily counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCommit {
    pub screen_secs: u64,
    pub overuse_secs: u64,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    pub fn new() -> Self {
        Self {
            mode: TimerMode::Idle,
            segment_start: None,
            accumulated_secs: 0,
            overuse_secs: 0,
            last_prompt_secs: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.mode == TimerMode::Running
    }

    /// Total active seconds at `now`. A read, not a transition: the
    /// accumulated total is only updated by `pause` and `reset`.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        match (self.mode, self.segment_start) {
            (TimerMode::Running, Some(start)) => self.accumulated_secs + seconds_between(start, now),
            _ => self.accumulated_secs,
        }
    }

    /// Starts a fresh session from `Idle`, or resumes from `Paused`.
    /// Calling while already running is a warned no-op so duplicate UI
    /// dispatch cannot corrupt the running segment.
    pub fn start(&mut self, now: DateTime<Utc>) -> StartOutcome {
        match self.mode {
            TimerMode::Idle => {
                *self = Self {
                    mode: TimerMode::Running,
                    segment_start: Some(now),
                    accumulated_secs: 0,
                    overuse_secs: 0,
                    last_prompt_secs: 0,
                };
                StartOutcome::Started
            }
            TimerMode::Paused => {
                self.segment_start = Some(now);
                self.mode = TimerMode::Running;
                StartOutcome::Resumed
            }
            TimerMode::Running => {
                warn!("start ignored: timer already running");
                StartOutcome::AlreadyRunning
            }
        }
    }

    /// Folds the live segment into the accumulated total. Returns false
    /// (warned no-op) unless running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        if self.mode != TimerMode::Running {
            warn!("pause ignored: timer not running");
            return false;
        }
        self.accumulated_secs = self.elapsed_secs(now);
        self.segment_start = None;
        self.mode = TimerMode::Paused;
        true
    }

    /// Ends the session, returning the totals to commit. `None` when
    /// there was no session to end.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<SessionCommit> {
        if self.mode == TimerMode::Idle {
            return None;
        }
        let commit = SessionCommit {
            screen_secs: self.elapsed_secs(now),
            overuse_secs: self.overuse_secs,
        };
        *self = Self::new();
        Some(commit)
    }
}
