//! Guided eye-relief activities: the exercise sequence and the rest
//! countdown.
//!
//! The exercise runs two identical cycles alternating ten seconds of
//! closed eyes with twenty seconds of following a moving focus point
//! (vertical, horizontal, circular, two diagonals), preceded by a short
//! instruction and countdown. Move speeds are user-tunable per
//! direction. The runners are cancellable so an early end can be
//! recorded distinctly from completion.

use crate::libs::messages::Message;
use crate::libs::notify::Alerter;
use crate::msg_print;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::{sleep, Duration};

pub const REST_DURATION_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Instructions,
    Countdown,
    CloseEyes,
    Vertical,
    Horizontal,
    Circular,
    Diagonal1,
    Diagonal2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub kind: PhaseKind,
    pub duration_secs: u64,
    pub instruction: &'static str,
}

/// Seconds per pass of the moving focus point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

/// Per-direction speed settings for the tracking moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SpeedSettings {
    pub vertical: Speed,
    pub horizontal: Speed,
    pub circular: Speed,
    pub diagonal1: Speed,
    pub diagonal2: Speed,
}

impl SpeedSettings {
    /// Seconds per pass for a tracking move; non-tracking phases have
    /// no speed.
    pub fn seconds_per_pass(&self, kind: PhaseKind) -> Option<f64> {
        let (setting, slow, normal, fast) = match kind {
            PhaseKind::Vertical => (self.vertical, 1.5, 1.0, 0.7),
            PhaseKind::Horizontal => (self.horizontal, 2.0, 1.5, 1.0),
            PhaseKind::Circular => (self.circular, 3.0, 2.0, 1.5),
            PhaseKind::Diagonal1 => (self.diagonal1, 2.0, 1.5, 1.0),
            PhaseKind::Diagonal2 => (self.diagonal2, 2.0, 1.5, 1.0),
            _ => return None,
        };
        Some(match setting {
            Speed::Slow => slow,
            Speed::Normal => normal,
            Speed::Fast => fast,
        })
    }
}

/// How a guided activity ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityOutcome {
    Completed,
    EarlyEnd,
}

/// The full exercise sequence: instructions, countdown, then two cycles.
pub fn exercise_sequence() -> Vec<Phase> {
    let cycle = [
        Phase { kind: PhaseKind::CloseEyes, duration_secs: 10, instruction: "Close your eyes" },
        Phase { kind: PhaseKind::Vertical, duration_secs: 20, instruction: "Follow the point - vertical" },
        Phase { kind: PhaseKind::CloseEyes, duration_secs: 10, instruction: "Close your eyes" },
        Phase { kind: PhaseKind::Horizontal, duration_secs: 20, instruction: "Follow the point - horizontal" },
        Phase { kind: PhaseKind::CloseEyes, duration_secs: 10, instruction: "Close your eyes" },
        Phase { kind: PhaseKind::Circular, duration_secs: 20, instruction: "Follow the point - circular" },
        Phase { kind: PhaseKind::CloseEyes, duration_secs: 10, instruction: "Close your eyes" },
        Phase { kind: PhaseKind::Diagonal1, duration_secs: 20, instruction: "Follow the point - diagonal ↘" },
        Phase { kind: PhaseKind::CloseEyes, duration_secs: 10, instruction: "Close your eyes" },
        Phase { kind: PhaseKind::Diagonal2, duration_secs: 20, instruction: "Follow the point - diagonal ↙" },
    ];

    let mut sequence = vec![
        Phase {
            kind: PhaseKind::Instructions,
            duration_secs: 3,
            instruction: "Keep your head still at arm's length, move only your eyes",
        },
        Phase { kind: PhaseKind::Countdown, duration_secs: 5, instruction: "Exercise starts in" },
    ];
    sequence.extend_from_slice(&cycle);
    sequence.extend_from_slice(&cycle);
    sequence
}

/// Runs the exercise sequence, printing each phase and sounding the
/// transition tones. Cancellation (the early-end signal) wins over the
/// remaining phases.
pub async fn run_exercise(alerter: &Alerter, speeds: SpeedSettings, cancel: &Arc<Notify>) -> ActivityOutcome {
    msg_print!(Message::ExerciseStarting);
    alerter.activity_start();

    for phase in exercise_sequence() {
        let instruction = match speeds.seconds_per_pass(phase.kind) {
            Some(pace) => format!("{} ({:.1}s per pass)", phase.instruction, pace),
            None => phase.instruction.to_string(),
        };
        msg_print!(Message::ExercisePhase(instruction, phase.duration_secs));
        if phase.kind == PhaseKind::CloseEyes {
            alerter.open_eyes();
        }
        tokio::select! {
            _ = sleep(Duration::from_secs(phase.duration_secs)) => {}
            _ = cancel.notified() => {
                msg_print!(Message::ExerciseEarlyEnd);
                return ActivityOutcome::EarlyEnd;
            }
        }
    }

    alerter.activity_end();
    msg_print!(Message::ExerciseComplete);
    ActivityOutcome::Completed
}

/// Runs the close-eyes rest countdown for `duration_secs`.
pub async fn run_rest(alerter: &Alerter, duration_secs: u64, cancel: &Arc<Notify>) -> ActivityOutcome {
    msg_print!(Message::RestStarting(duration_secs));
    alerter.activity_start();

    tokio::select! {
        _ = sleep(Duration::from_secs(duration_secs)) => {
            alerter.activity_end();
            msg_print!(Message::RestComplete);
            ActivityOutcome::Completed
        }
        _ = cancel.notified() => {
            msg_print!(Message::RestEarlyEnd);
            ActivityOutcome::EarlyEnd
        }
    }
}
