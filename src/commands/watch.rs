//! Interactive screen time watch command.
//!
//! Runs the session timer in the foreground: a one-second scheduler
//! tick drives threshold detection and snapshot autosaves, while stdin
//! accepts timer commands. When a break comes due the alerter dings and
//! the next input line is interpreted as the break choice. The timer
//! keeps running until the user answers, so answering late accrues
//! overuse.

use crate::{
    api::store::{CounterStore, RestStore},
    db::snapshots::Snapshots,
    libs::{
        breaks::{BreakChoice, BreakDue, BreakPolicy, FollowUp},
        clock::{Clock, SystemClock},
        config::{Config, TimerConfig},
        coordinator::WriteRegistry,
        counters::{seconds_to_interval, today_in},
        exercise::{self, ActivityOutcome, SpeedSettings},
        messages::Message,
        notify::Alerter,
        session::SessionController,
        snapshot::MemoryHandoff,
        timer::{StartOutcome, TimerMode},
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Notify;
use tokio::time::{interval, Duration, MissedTickBehavior};

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Override the break interval in minutes for this run
    #[arg(short, long)]
    interval: Option<u64>,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    let config = Config::read()?;
    let Some(server) = config.server else {
        msg_bail_anyhow!(Message::Custom("Server is not configured, run `okulo init` first".to_string()));
    };
    let timer_cfg = config.timer.unwrap_or_default();
    let notifications = config.notifications.unwrap_or_default();
    let alerter = Alerter::new(notifications.desktop, notifications.sound);

    let policy = match args.interval {
        Some(minutes) => BreakPolicy::new(minutes * 60),
        None => timer_cfg.break_policy(),
    };
    let tz = timer_cfg.reference_timezone();

    let store: Arc<dyn CounterStore> = Arc::new(RestStore::new(&server));
    let registry = WriteRegistry::new(store);
    let mut controller = SessionController::new(
        registry,
        Box::new(Snapshots::new()?),
        Arc::new(MemoryHandoff::new()),
        policy,
        &server.user_id,
        &server.username,
        today_in(tz),
    );
    controller.hydrate().await;

    let clock = SystemClock;
    let now = clock.now();
    let mut awaiting_choice = false;
    if let Some(due) = controller.mount(now) {
        announce_break(&alerter, &due);
        awaiting_choice = true;
    }
    if controller.state().mode != TimerMode::Idle {
        msg_info!(Message::TimerRestored(seconds_to_interval(controller.elapsed_secs(now))));
    }

    msg_print!(Message::WatchStarted);
    msg_print!(Message::WatchHelp);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let autosave_every = chrono::Duration::seconds(timer_cfg.autosave_interval_secs.max(1) as i64);
    let mut last_autosave = clock.now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = clock.now();
                if controller.roll_date(today_in(tz)) {
                    controller.hydrate().await;
                }
                if let Some(due) = controller.tick(now) {
                    announce_break(&alerter, &due);
                    awaiting_choice = true;
                }
                if now - last_autosave >= autosave_every {
                    controller.autosave(now);
                    last_autosave = now;
                }
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                let now = clock.now();
                let input = line.trim().to_lowercase();

                if awaiting_choice {
                    let choice = match input.as_str() {
                        "e" | "exercise" => Some(BreakChoice::EyeExercise),
                        "c" | "close" => Some(BreakChoice::CloseEyes),
                        "s" | "skip" => Some(BreakChoice::Skip),
                        _ => {
                            prompt_choices();
                            None
                        }
                    };
                    if let Some(choice) = choice {
                        awaiting_choice = false;
                        handle_break_choice(&mut controller, &alerter, &mut lines, &timer_cfg, choice).await;
                    }
                    continue;
                }

                match input.as_str() {
                    "" => {}
                    "start" | "s" => match controller.start(now) {
                        StartOutcome::Started => msg_print!(Message::TimerStarted),
                        StartOutcome::Resumed => msg_print!(Message::TimerResumed),
                        StartOutcome::AlreadyRunning => msg_warning!(Message::TimerAlreadyRunning),
                    },
                    "pause" | "p" => {
                        if controller.pause(now) {
                            msg_print!(Message::TimerPaused);
                        } else {
                            msg_warning!(Message::TimerNotRunning);
                        }
                    }
                    "reset" | "r" => match controller.reset(now) {
                        Some(commit) => msg_print!(Message::TimerReset(seconds_to_interval(commit.screen_secs))),
                        None => msg_print!(Message::TimerIdle),
                    },
                    "exercise" | "e" => {
                        // The session survives the detour: state is
                        // stashed before the activity and restored
                        // after, with the threshold check re-run.
                        controller.stash_handoff(now);
                        let _ = run_exercise_interactive(&alerter, timer_cfg.exercise_speeds, &mut lines).await;
                        let now = clock.now();
                        if let Some(due) = controller.mount(now) {
                            announce_break(&alerter, &due);
                            awaiting_choice = true;
                        }
                    }
                    "status" => {
                        print_status(&controller, now);
                    }
                    "help" | "h" => msg_print!(Message::WatchHelp),
                    "quit" | "q" | "exit" => break,
                    other => msg_warning!(Message::UnknownCommand(other.to_string())),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let now = clock.now();
    if controller.state().mode != TimerMode::Idle {
        controller.save_durable(now);
    }
    controller.wait_for_flush().await;
    msg_print!(Message::WatchStopped);
    Ok(())
}

fn announce_break(alerter: &Alerter, due: &BreakDue) {
    alerter.break_due(due.elapsed_secs / 60);
    msg_print!(Message::BreakDueNow(due.elapsed_secs / 60), true);
    prompt_choices();
}

fn prompt_choices() {
    msg_print!(Message::BreakPromptTitle);
    msg_print!(Message::Custom(format!(
        "  [e] {}  [c] {}  [s] {}",
        Message::BreakChoiceExercise,
        Message::BreakChoiceCloseEyes,
        Message::BreakChoiceSkip
    )));
}

fn print_status(controller: &SessionController, now: chrono::DateTime<chrono::Utc>) {
    let state = controller.state();
    let mode = match state.mode {
        TimerMode::Idle => Message::TimerIdle,
        TimerMode::Running => Message::Custom(format!("Running: {}", seconds_to_interval(controller.elapsed_secs(now)))),
        TimerMode::Paused => Message::Custom(format!("Paused at {}", seconds_to_interval(controller.elapsed_secs(now)))),
    };
    msg_print!(mode);
    let _ = View::day(&controller.counters());
}

/// Applies the break choice and runs the follow-up activity. An early
/// end is flushed to the store before control returns to the loop.
async fn handle_break_choice(
    controller: &mut SessionController,
    alerter: &Alerter,
    lines: &mut Lines<BufReader<Stdin>>,
    timer_cfg: &TimerConfig,
    choice: BreakChoice,
) {
    let now = SystemClock.now();
    let resolution = controller.respond(choice, now);
    if resolution.commit.overuse_secs > 0 {
        msg_print!(Message::OveruseRecorded(resolution.commit.overuse_secs));
    }

    match resolution.follow_up {
        FollowUp::SkipAndRestart => {
            msg_print!(Message::BreakSkipped);
            return;
        }
        FollowUp::Exercise => {
            if run_exercise_interactive(alerter, timer_cfg.exercise_speeds, lines).await == ActivityOutcome::EarlyEnd {
                controller.record_early_end(BreakChoice::EyeExercise).await;
            }
        }
        FollowUp::Rest => {
            if run_rest_interactive(alerter, lines, timer_cfg.rest_duration_secs).await == ActivityOutcome::EarlyEnd {
                controller.record_early_end(BreakChoice::CloseEyes).await;
            }
        }
    }

    // A fresh session starts as soon as the activity hands back.
    controller.start(SystemClock.now());
    msg_print!(Message::TimerStarted);
}

/// Runs the exercise sequence; any input line ends it early.
async fn run_exercise_interactive(
    alerter: &Alerter,
    speeds: SpeedSettings,
    lines: &mut Lines<BufReader<Stdin>>,
) -> ActivityOutcome {
    let cancel = Arc::new(Notify::new());
    let mut task = tokio::spawn({
        let alerter = *alerter;
        let cancel = cancel.clone();
        async move { exercise::run_exercise(&alerter, speeds, &cancel).await }
    });
    tokio::select! {
        outcome = &mut task => outcome.unwrap_or(ActivityOutcome::EarlyEnd),
        _ = lines.next_line() => {
            cancel.notify_one();
            task.await.unwrap_or(ActivityOutcome::EarlyEnd)
        }
    }
}

/// Runs the close-eyes rest countdown; any input line ends it early.
async fn run_rest_interactive(alerter: &Alerter, lines: &mut Lines<BufReader<Stdin>>, duration_secs: u64) -> ActivityOutcome {
    let cancel = Arc::new(Notify::new());
    let mut task = tokio::spawn({
        let alerter = *alerter;
        let cancel = cancel.clone();
        async move { exercise::run_rest(&alerter, duration_secs, &cancel).await }
    });
    tokio::select! {
        outcome = &mut task => outcome.unwrap_or(ActivityOutcome::EarlyEnd),
        _ = lines.next_line() => {
            cancel.notify_one();
            task.await.unwrap_or(ActivityOutcome::EarlyEnd)
        }
    }
}
