//! Display implementation for okulo application messages.
//!
//! All user-facing text lives here, so wording stays consistent and the
//! rest of the code deals only in typed `Message` values.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === TIMER MESSAGES ===
            Message::TimerStarted => "Session timer started".to_string(),
            Message::TimerResumed => "Session timer resumed".to_string(),
            Message::TimerAlreadyRunning => "Timer is already running".to_string(),
            Message::TimerPaused => "Session timer paused".to_string(),
            Message::TimerNotRunning => "Timer is not running".to_string(),
            Message::TimerReset(duration) => format!("Session ended after {}", duration),
            Message::TimerRestored(elapsed) => format!("Restored previous session at {}", elapsed),
            Message::TimerIdle => "Timer is idle".to_string(),

            // === BREAK MESSAGES ===
            Message::BreakDueNow(minutes) => format!("Time for an eye break! ({} minutes elapsed)", minutes),
            Message::BreakPromptTitle => "How would you like to rest your eyes?".to_string(),
            Message::BreakChoiceExercise => "Eye exercise".to_string(),
            Message::BreakChoiceCloseEyes => "Close eyes and rest".to_string(),
            Message::BreakChoiceSkip => "Skip this break".to_string(),
            Message::BreakSkipped => "Break skipped, new session started".to_string(),
            Message::OveruseRecorded(seconds) => format!("Overuse recorded: {} seconds past the reminder", seconds),

            // === ACTIVITY MESSAGES ===
            Message::ExerciseStarting => "Starting eye exercise".to_string(),
            Message::ExercisePhase(instruction, seconds) => format!("{} ({}s)", instruction, seconds),
            Message::ExerciseComplete => "Exercise complete! Well done".to_string(),
            Message::ExerciseEarlyEnd => "Exercise ended early".to_string(),
            Message::RestStarting(seconds) => format!("Close your eyes and rest for {} seconds", seconds),
            Message::RestComplete => "Rest complete, you can open your eyes".to_string(),
            Message::RestEarlyEnd => "Rest ended early".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigModuleTimer => "Timer settings".to_string(),
            Message::ConfigModuleServer => "Counters server settings".to_string(),
            Message::ConfigModuleNotifications => "Notification settings".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptBreakInterval => "Break interval in minutes".to_string(),
            Message::PromptRestDuration => "Close-eyes rest duration in seconds".to_string(),
            Message::PromptAutosaveInterval => "Snapshot autosave interval in seconds".to_string(),
            Message::PromptTimezone => "Reference timezone for daily counters".to_string(),
            Message::PromptServerApiUrl => "Counters API base URL".to_string(),
            Message::PromptServerApiKey => "Counters API key".to_string(),
            Message::PromptServerUserId => "User id for counter rows".to_string(),
            Message::PromptServerUsername => "Display name for counter rows".to_string(),
            Message::PromptNotificationsEnabled => "Enable desktop notifications?".to_string(),
            Message::PromptSoundEnabled => "Enable alert sounds?".to_string(),
            Message::BreakIntervalClamped(requested, applied) => {
                format!("Break interval {}s is out of bounds, using {}s", requested, applied)
            }
            Message::InvalidTimezone(tz) => format!("Unknown timezone '{}', using default", tz),

            // === COUNTER / SYNC MESSAGES ===
            Message::StatsHeader(date) => format!("Screen time for {}", date),
            Message::StatsNotFoundForDate(date) => format!("No usage recorded for {}", date),
            Message::CountersFetchFailed(err) => format!("Failed to fetch counters: {}", err),
            Message::CounterWriteFailed(err) => format!("Failed to write counters: {}", err),

            // === SNAPSHOT MESSAGES ===
            Message::SnapshotSaveFailed(err) => format!("Failed to save timer snapshot: {}", err),

            // === EXPORT MESSAGES ===
            Message::ExportSuccess(path) => format!("Counters exported to: {}", path),
            Message::ExportNoData => "Nothing to export".to_string(),

            // === WATCH MESSAGES ===
            Message::WatchStarted => "Watching screen time. Type 'help' for commands".to_string(),
            Message::WatchStopped => "Watch stopped".to_string(),
            Message::WatchHelp => {
                "Commands: start, pause, reset, exercise, status, quit".to_string()
            }
            Message::UnknownCommand(cmd) => format!("Unknown command '{}', type 'help'", cmd),

            // === GENERIC ===
            Message::Custom(text) => text.clone(),
        };
        write!(f, "{}", text)
    }
}
