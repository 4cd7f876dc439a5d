//! Session controller: wires the timer state machine, break policy,
//! write registry and snapshot stores into the single object the watch
//! loop drives.
//!
//! All counter mutations start from the registry's shared latest row
//! (never from a private copy) and are handed straight back to the
//! registry, so concurrent controllers for the same `(user, day)`
//! cannot lose each other's increments. Remote failures never bubble
//! out of the tick path; local state stays the source of truth.

use crate::libs::breaks::{BreakChoice, BreakDue, BreakPolicy, BreakResolution};
use crate::libs::counters::DailyCounters;
use crate::libs::coordinator::{counter_key, WriteRegistry};
use crate::libs::messages::Message;
use crate::libs::snapshot::{MemoryHandoff, SnapshotStore, TimerSnapshot, SNAPSHOT_KEY};
use crate::libs::timer::{SessionCommit, StartOutcome, TimerState};
use crate::msg_warning;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

pub struct SessionController {
    state: TimerState,
    policy: BreakPolicy,
    registry: Arc<WriteRegistry>,
    durable: Box<dyn SnapshotStore + Send + Sync>,
    handoff: Arc<MemoryHandoff>,
    user_id: String,
    username: String,
    date: NaiveDate,
    key: String,
}

impl SessionController {
    pub fn new(
        registry: Arc<WriteRegistry>,
        durable: Box<dyn SnapshotStore + Send + Sync>,
        handoff: Arc<MemoryHandoff>,
        policy: BreakPolicy,
        user_id: &str,
        username: &str,
        date: NaiveDate,
    ) -> Self {
        Self {
            state: TimerState::new(),
            policy,
            registry,
            durable,
            handoff,
            user_id: user_id.to_string(),
            username: username.to_string(),
            key: counter_key(user_id, date),
            date,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn policy(&self) -> BreakPolicy {
        self.policy
    }

    pub fn counters_key(&self) -> &str {
        &self.key
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.state.elapsed_secs(now)
    }

    /// The shared counters row local mutations are based on.
    pub fn counters(&self) -> DailyCounters {
        self.registry.latest(&self.key).unwrap_or_else(|| self.default_counters())
    }

    fn default_counters(&self) -> DailyCounters {
        DailyCounters::new(&self.user_id, &self.username, self.date, 1)
    }

    /// Fetches the remote row for the day (and the days-of-use figure)
    /// and reconciles it with any pending local state. Fetch failures
    /// fall back to a zeroed local row; the counters are eventually
    /// consistent and never block the timer.
    pub async fn hydrate(&self) -> DailyCounters {
        let store = self.registry.store();
        let fetched = match store.fetch(&self.user_id, self.date).await {
            Ok(row) => {
                let prior_days = store.days_of_use(&self.user_id).await.unwrap_or_else(|err| {
                    debug!(error = %err, "days-of-use count failed");
                    0
                });
                match row {
                    Some(mut row) => {
                        if row.days_of_use == 0 {
                            row.days_of_use = prior_days.max(1);
                        }
                        row
                    }
                    None => DailyCounters::new(&self.user_id, &self.username, self.date, prior_days + 1),
                }
            }
            Err(err) => {
                msg_warning!(Message::CountersFetchFailed(err.to_string()));
                self.default_counters()
            }
        };
        self.registry.reconcile_fetch(&self.key, fetched)
    }

    /// Switches the controller to a new calendar day (midnight crossed
    /// in the reference timezone). Returns true when the day changed;
    /// the caller should re-hydrate.
    pub fn roll_date(&mut self, today: NaiveDate) -> bool {
        if today == self.date {
            return false;
        }
        self.date = today;
        self.key = counter_key(&self.user_id, today);
        true
    }

    /// Restores timer state on mount: an in-process handoff wins over
    /// the durable snapshot. After a restore the threshold check runs
    /// immediately so prompts missed while unloaded surface now instead
    /// of being skipped.
    pub fn mount(&mut self, now: DateTime<Utc>) -> Option<BreakDue> {
        let restored = self
            .handoff
            .take(SNAPSHOT_KEY)
            .and_then(|raw| TimerSnapshot::decode(&raw))
            .and_then(|snapshot| snapshot.restore(now, TimerSnapshot::max_age()))
            .or_else(|| {
                self.durable
                    .get(SNAPSHOT_KEY)
                    .unwrap_or_else(|err| {
                        debug!(error = %err, "durable snapshot read failed");
                        None
                    })
                    .and_then(|raw| TimerSnapshot::decode(&raw))
                    .and_then(|snapshot| snapshot.restore(now, TimerSnapshot::max_age()))
            })?;

        self.state = restored;
        self.policy.check(&mut self.state, now)
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> StartOutcome {
        self.state.start(now)
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        let paused = self.state.pause(now);
        if paused {
            self.save_durable(now);
        }
        paused
    }

    /// One scheduler tick (or one catch-up after an execution gap):
    /// recomputes elapsed time from timestamps and runs threshold
    /// detection. Reading time never mutates the accumulated total.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<BreakDue> {
        if !self.state.is_running() {
            return None;
        }
        self.policy.check(&mut self.state, now)
    }

    /// Ends the session and folds its totals into the day's counters.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<SessionCommit> {
        let commit = self.state.reset(now)?;
        if commit.screen_secs > 0 || commit.overuse_secs > 0 {
            self.mutate_counters(|counters| counters.apply_commit(commit));
        }
        self.clear_durable();
        Some(commit)
    }

    /// Routes the user's break choice: late overuse is folded in, the
    /// session totals and the per-choice counter are committed, and for
    /// `Skip` the timer is already running again at zero.
    pub fn respond(&mut self, choice: BreakChoice, now: DateTime<Utc>) -> BreakResolution {
        let resolution = self.policy.respond(&mut self.state, choice, now);
        self.mutate_counters(|counters| {
            counters.apply_commit(resolution.commit);
            counters.record_choice(choice);
        });
        self.clear_durable();
        resolution
    }

    /// Records an early end of a guided activity and waits until the
    /// increment is durably stored. Without the flush, a refetch on the
    /// next screen could overwrite the not-yet-written increment.
    pub async fn record_early_end(&self, choice: BreakChoice) {
        self.mutate_counters(|counters| counters.record_early_end(choice));
        self.registry.wait_for_flush(&self.key).await;
    }

    pub async fn wait_for_flush(&self) {
        self.registry.wait_for_flush(&self.key).await;
    }

    fn mutate_counters<F>(&self, apply: F)
    where
        F: FnOnce(&mut DailyCounters),
    {
        let mut base = self.counters();
        // Identity fields are pinned here; a stale base from another
        // day must not leak a wrong key into the write.
        base.user_id = self.user_id.clone();
        base.username = self.username.clone();
        base.date = self.date;
        apply(&mut base);
        self.registry.request_write(&self.key, base);
    }

    /// Periodic autosave while running; a paused or idle timer is
    /// persisted at its transition points instead.
    pub fn autosave(&self, now: DateTime<Utc>) {
        if self.state.is_running() {
            self.save_durable(now);
        }
    }

    pub fn save_durable(&self, now: DateTime<Utc>) {
        match TimerSnapshot::capture(&self.state, now).encode() {
            Ok(raw) => {
                if let Err(err) = self.durable.set(SNAPSHOT_KEY, &raw) {
                    msg_warning!(Message::SnapshotSaveFailed(err.to_string()));
                }
            }
            Err(err) => msg_warning!(Message::SnapshotSaveFailed(err.to_string())),
        }
    }

    /// Stashes the current state for an in-process flow change (e.g.
    /// into the exercise screen and back).
    pub fn stash_handoff(&self, now: DateTime<Utc>) {
        if let Ok(raw) = TimerSnapshot::capture(&self.state, now).encode() {
            self.handoff.put(SNAPSHOT_KEY, raw);
        }
    }

    fn clear_durable(&self) {
        if let Err(err) = self.durable.remove(SNAPSHOT_KEY) {
            debug!(error = %err, "durable snapshot remove failed");
        }
    }
}
