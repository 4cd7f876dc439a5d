//! Break scheduling and overuse accounting.
//!
//! [`BreakPolicy::check`] detects when elapsed time crosses a new
//! multiple of the break interval. It runs on every tick and, crucially,
//! on every catch-up after an execution gap (suspend, restore from
//! snapshot), so reminders that should have fired during the gap are
//! raised instead of silently skipped. Time the user spends active after
//! a reminder is "overuse": each later crossing folds the full gap since
//! the previous prompt mark into `overuse_secs`, and a break response
//! folds in the late remainder since the last mark. With reminders
//! continuously ignored, committed overuse equals the time since the
//! first prompt.

use crate::libs::timer::{SessionCommit, TimerState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_BREAK_INTERVAL_SECS: u64 = 60;
pub const MAX_BREAK_INTERVAL_SECS: u64 = 4 * 60 * 60;
pub const DEFAULT_BREAK_INTERVAL_SECS: u64 = 30 * 60;

/// What the user picked on the break prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakChoice {
    EyeExercise,
    CloseEyes,
    Skip,
}

/// A break prompt that just became due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakDue {
    pub elapsed_secs: u64,
    /// The interval boundary this prompt is for (a multiple of the interval).
    pub prompt_at_secs: u64,
    /// Overuse seconds folded in by this crossing (0 for the first prompt).
    pub overuse_added: u64,
}

/// What should happen after the user answers the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Run the guided exercise flow; a fresh session starts on return.
    Exercise,
    /// Run the rest countdown; a fresh session starts on return.
    Rest,
    /// No navigation: the timer has already restarted at zero.
    SkipAndRestart,
}

/// Resolution of a break prompt: the per-choice counter to bump, the
/// session totals to commit, and the follow-up action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakResolution {
    pub choice: BreakChoice,
    pub commit: SessionCommit,
    pub follow_up: FollowUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPolicy {
    interval_secs: u64,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_INTERVAL_SECS)
    }
}

impl BreakPolicy {
    /// Out-of-bounds intervals are clamped, never rejected.
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs: interval_secs.clamp(MIN_BREAK_INTERVAL_SECS, MAX_BREAK_INTERVAL_SECS),
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Threshold detection. Mutates the prompt bookkeeping on `state`
    /// and returns the due prompt, if any. A single call that spans
    /// several interval boundaries (catch-up after a gap) yields exactly
    /// one prompt, with the skipped intervals folded into overuse.
    pub fn check(&self, state: &mut TimerState, now: DateTime<Utc>) -> Option<BreakDue> {
        let elapsed = state.elapsed_secs(now);
        let intervals_passed = elapsed / self.interval_secs;
        let last_prompt_interval = state.last_prompt_secs / self.interval_secs;

        if intervals_passed <= last_prompt_interval {
            return None;
        }

        let prompt_at = intervals_passed * self.interval_secs;
        // The first prompt adds no overuse: only time the user was
        // already notified about counts.
        let overuse_added = if state.last_prompt_secs > 0 {
            prompt_at - state.last_prompt_secs
        } else {
            0
        };
        state.overuse_secs += overuse_added;
        state.last_prompt_secs = prompt_at;

        Some(BreakDue {
            elapsed_secs: elapsed,
            prompt_at_secs: prompt_at,
            overuse_added,
        })
    }

    /// Seconds since the last prompt mark that have not yet been folded
    /// into overuse; the user may answer well after the ding.
    pub fn late_overuse(&self, state: &TimerState, now: DateTime<Utc>) -> u64 {
        if state.last_prompt_secs == 0 {
            return 0;
        }
        state.elapsed_secs(now).saturating_sub(state.last_prompt_secs)
    }

    /// Applies the user's break choice: folds late overuse, ends the
    /// session and, for `Skip`, immediately restarts it at zero. The
    /// caller executes the returned effects (counter increments, writes,
    /// navigation).
    pub fn respond(&self, state: &mut TimerState, choice: BreakChoice, now: DateTime<Utc>) -> BreakResolution {
        state.overuse_secs += self.late_overuse(state, now);

        let commit = state.reset(now).unwrap_or(SessionCommit {
            screen_secs: 0,
            overuse_secs: 0,
        });

        let follow_up = match choice {
            BreakChoice::EyeExercise => FollowUp::Exercise,
            BreakChoice::CloseEyes => FollowUp::Rest,
            BreakChoice::Skip => {
                state.start(now);
                FollowUp::SkipAndRestart
            }
        };

        BreakResolution { choice, commit, follow_up }
    }
}
