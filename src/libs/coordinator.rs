//! Per-key write coalescing for the remote counters store.
//!
//! Bursts of local counter updates (autosaves, rapid break choices,
//! several controllers alive at once) must collapse into the minimum
//! number of network writes while still guaranteeing that the *last*
//! requested snapshot becomes durable. Each `user_id:date` key gets one
//! coordinator holding the latest desired row plus two flags:
//!
//! - `in_flight`: a write task is currently talking to the store. At
//!   most one per key, ever.
//! - `needs_flush`: the latest row changed since the running write was
//!   dispatched; the write loop re-reads `latest` before every attempt,
//!   so intermediate snapshots are dropped and stale data is never sent.
//!
//! Failed writes are logged and dropped; durability re-establishes
//! itself through the next `request_write`. The registry is an
//! explicitly constructed object injected from the composition root,
//! with no hidden module-level state.

use crate::api::store::CounterStore;
use crate::libs::counters::DailyCounters;
use crate::libs::messages::Message;
use crate::msg_warning;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::debug;

const FLUSH_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Coordinator key for one user's calendar day.
pub fn counter_key(user_id: &str, date: NaiveDate) -> String {
    format!("{}:{}", user_id, date.format("%Y-%m-%d"))
}

#[derive(Default)]
struct CoordState {
    latest: Option<DailyCounters>,
    in_flight: bool,
    needs_flush: bool,
}

impl CoordState {
    fn quiescent(&self) -> bool {
        !self.in_flight && !self.needs_flush
    }
}

#[derive(Default)]
struct Coordinator {
    state: Mutex<CoordState>,
}

/// Registry of write coordinators, one per `user_id:date` key, shared by
/// every caller that mutates counters.
pub struct WriteRegistry {
    store: Arc<dyn CounterStore>,
    coordinators: Mutex<HashMap<String, Arc<Coordinator>>>,
}

impl WriteRegistry {
    pub fn new(store: Arc<dyn CounterStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            coordinators: Mutex::new(HashMap::new()),
        })
    }

    pub fn store(&self) -> Arc<dyn CounterStore> {
        Arc::clone(&self.store)
    }

    fn coordinator(&self, key: &str) -> Arc<Coordinator> {
        let mut map = self.coordinators.lock();
        Arc::clone(map.entry(key.to_string()).or_default())
    }

    /// Records `snapshot` as the desired state for `key` and schedules a
    /// flush. Returns immediately; the write happens in the background.
    pub fn request_write(self: &Arc<Self>, key: &str, snapshot: DailyCounters) {
        let coord = self.coordinator(key);
        {
            let mut state = coord.state.lock();
            state.latest = Some(snapshot);
            state.needs_flush = true;
        }
        self.spawn_flush(key.to_string());
    }

    /// The most recent desired row for `key`. Every local mutation must
    /// start from this shared value, not from a caller's private copy,
    /// or one caller's increment can be lost to another's stale base.
    pub fn latest(&self, key: &str) -> Option<DailyCounters> {
        self.coordinator(key).state.lock().latest.clone()
    }

    /// Reconciles a freshly fetched row with local state: while a write
    /// is pending or in flight the local snapshot wins, otherwise the
    /// fetched row becomes the new shared latest.
    pub fn reconcile_fetch(&self, key: &str, fetched: DailyCounters) -> DailyCounters {
        let coord = self.coordinator(key);
        let mut state = coord.state.lock();
        match &state.latest {
            Some(local) if !state.quiescent() => local.clone(),
            _ => {
                state.latest = Some(fetched.clone());
                fetched
            }
        }
    }

    /// True while `key` has an in-flight or pending write.
    pub fn pending(&self, key: &str) -> bool {
        !self.coordinator(key).state.lock().quiescent()
    }

    fn spawn_flush(self: &Arc<Self>, key: String) {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            registry.flush(&key).await;
        });
    }

    /// Drives the write loop for `key`. Returns immediately when another
    /// write is already in flight: that write's loop will pick up the
    /// pending flag and re-read the latest snapshot itself.
    pub async fn flush(self: &Arc<Self>, key: &str) {
        let coord = self.coordinator(key);
        {
            let mut state = coord.state.lock();
            if state.in_flight {
                return;
            }
            state.in_flight = true;
        }

        loop {
            let payload = {
                let mut state = coord.state.lock();
                if !state.needs_flush {
                    break;
                }
                state.needs_flush = false;
                state.latest.clone()
            };
            let Some(counters) = payload else { continue };

            if let Err(err) = self.store.upsert(&counters).await {
                // Local state stays the source of truth; the next
                // request_write naturally retries.
                msg_warning!(Message::CounterWriteFailed(err.to_string()));
            } else {
                debug!(key, "counters written");
            }
        }

        let redispatch = {
            let mut state = coord.state.lock();
            state.in_flight = false;
            state.needs_flush
        };
        // A request slipped in between the loop exit and clearing the
        // in-flight flag; it may have bounced off our in-flight guard.
        if redispatch {
            self.spawn_flush(key.to_string());
        }
    }

    /// Resolves once `key` has no in-flight and no pending write. Used
    /// where durability must be guaranteed before moving on, e.g. the
    /// early-end increment before leaving a guided activity.
    pub async fn wait_for_flush(self: &Arc<Self>, key: &str) {
        let coord = self.coordinator(key);
        loop {
            if coord.state.lock().quiescent() {
                return;
            }
            self.flush(key).await;
            tokio::time::sleep(FLUSH_POLL_INTERVAL).await;
        }
    }
}
