#[derive(Debug, Clone)]
pub enum Message {
    // === TIMER MESSAGES ===
    TimerStarted,
    TimerResumed,
    TimerAlreadyRunning,
    TimerPaused,
    TimerNotRunning,
    TimerReset(String),   // formatted session duration
    TimerRestored(String), // formatted elapsed at restore
    TimerIdle,

    // === BREAK MESSAGES ===
    BreakDueNow(u64),        // minutes elapsed
    BreakPromptTitle,
    BreakChoiceExercise,
    BreakChoiceCloseEyes,
    BreakChoiceSkip,
    BreakSkipped,
    OveruseRecorded(u64), // seconds

    // === ACTIVITY MESSAGES ===
    ExerciseStarting,
    ExercisePhase(String, u64), // instruction, seconds
    ExerciseComplete,
    ExerciseEarlyEnd,
    RestStarting(u64), // seconds
    RestComplete,
    RestEarlyEnd,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleTimer,
    ConfigModuleServer,
    ConfigModuleNotifications,
    PromptSelectModules,
    PromptBreakInterval,
    PromptRestDuration,
    PromptAutosaveInterval,
    PromptTimezone,
    PromptServerApiUrl,
    PromptServerApiKey,
    PromptServerUserId,
    PromptServerUsername,
    PromptNotificationsEnabled,
    PromptSoundEnabled,
    BreakIntervalClamped(u64, u64), // requested, applied (seconds)
    InvalidTimezone(String),

    // === COUNTER / SYNC MESSAGES ===
    StatsHeader(String),          // date
    StatsNotFoundForDate(String), // date
    CountersFetchFailed(String),
    CounterWriteFailed(String),

    // === SNAPSHOT MESSAGES ===
    SnapshotSaveFailed(String),

    // === EXPORT MESSAGES ===
    ExportSuccess(String), // path
    ExportNoData,

    // === WATCH MESSAGES ===
    WatchStarted,
    WatchStopped,
    WatchHelp,
    UnknownCommand(String),

    // === GENERIC ===
    Custom(String),
}
