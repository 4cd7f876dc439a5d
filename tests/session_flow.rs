#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use okulo::api::store::{CounterStore, StoreError};
    use okulo::libs::breaks::{BreakChoice, BreakPolicy, FollowUp};
    use okulo::libs::coordinator::WriteRegistry;
    use okulo::libs::counters::DailyCounters;
    use okulo::libs::session::SessionController;
    use okulo::libs::snapshot::{MemoryHandoff, SnapshotStore};
    use okulo::libs::timer::TimerMode;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// In-memory remote store double.
    #[derive(Default)]
    struct MockStore {
        rows: Mutex<HashMap<(String, NaiveDate), DailyCounters>>,
        prior_days: u32,
    }

    impl MockStore {
        fn row(&self, user_id: &str, date: NaiveDate) -> Option<DailyCounters> {
            self.rows.lock().get(&(user_id.to_string(), date)).cloned()
        }
    }

    #[async_trait]
    impl CounterStore for MockStore {
        async fn fetch(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyCounters>, StoreError> {
            Ok(self.row(user_id, date))
        }

        async fn upsert(&self, counters: &DailyCounters) -> Result<(), StoreError> {
            self.rows
                .lock()
                .insert((counters.user_id.clone(), counters.date), counters.clone());
            Ok(())
        }

        async fn days_of_use(&self, _user_id: &str) -> Result<u32, StoreError> {
            Ok(self.prior_days)
        }

        async fn fetch_all(&self, user_id: &str) -> Result<Vec<DailyCounters>, StoreError> {
            let rows = self.rows.lock();
            Ok(rows.values().filter(|r| r.user_id == user_id).cloned().collect())
        }
    }

    /// In-memory durable snapshot store double.
    #[derive(Default)]
    struct MemSnapshots {
        map: Mutex<HashMap<String, String>>,
    }

    impl SnapshotStore for MemSnapshots {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.map.lock().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.map.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.map.lock().remove(key);
            Ok(())
        }
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn controller(store: Arc<MockStore>, interval_secs: u64) -> SessionController {
        SessionController::new(
            WriteRegistry::new(store),
            Box::new(MemSnapshots::default()),
            Arc::new(MemoryHandoff::new()),
            BreakPolicy::new(interval_secs),
            "u1",
            "User",
            day(),
        )
    }

    #[tokio::test]
    async fn hydrate_counts_a_fresh_day_of_use() {
        let store = Arc::new(MockStore {
            prior_days: 3,
            ..Default::default()
        });
        let controller = controller(store, 1800);

        let counters = controller.hydrate().await;
        assert_eq!(counters.days_of_use, 4);
        assert_eq!(counters.sessions_count, 0);
        assert_eq!(controller.counters().days_of_use, 4);
    }

    #[tokio::test]
    async fn hydrate_adopts_an_existing_remote_row() {
        let store = Arc::new(MockStore::default());
        let mut existing = DailyCounters::new("u1", "User", day(), 7);
        existing.screen_time_secs = 3600;
        existing.sessions_count = 2;
        store.rows.lock().insert(("u1".to_string(), day()), existing);

        let controller = controller(store, 1800);
        let counters = controller.hydrate().await;
        assert_eq!(counters.screen_time_secs, 3600);
        assert_eq!(counters.days_of_use, 7);
    }

    #[tokio::test]
    async fn answering_a_break_commits_session_and_choice() {
        let store = Arc::new(MockStore::default());
        let mut controller = controller(store.clone(), 1800);
        controller.hydrate().await;

        controller.start(t(0));
        let due = controller.tick(t(1800)).unwrap();
        assert_eq!(due.prompt_at_secs, 1800);

        let resolution = controller.respond(BreakChoice::CloseEyes, t(1800));
        assert_eq!(resolution.follow_up, FollowUp::Rest);
        controller.wait_for_flush().await;

        let row = store.row("u1", day()).unwrap();
        assert_eq!(row.screen_time_secs, 1800);
        assert_eq!(row.overuse_secs, 0);
        assert_eq!(row.eye_close, 1);
        assert_eq!(row.sessions_count, 1);
    }

    #[tokio::test]
    async fn late_answer_writes_the_overuse_total() {
        let store = Arc::new(MockStore::default());
        let mut controller = controller(store.clone(), 60);
        controller.hydrate().await;

        controller.start(t(0));
        // Prompt at 60, ignored through two more boundaries.
        assert!(controller.tick(t(60)).is_some());
        assert!(controller.tick(t(120)).is_some());
        assert!(controller.tick(t(180)).is_some());

        controller.respond(BreakChoice::EyeExercise, t(185));
        controller.wait_for_flush().await;

        let row = store.row("u1", day()).unwrap();
        assert_eq!(row.screen_time_secs, 185);
        assert_eq!(row.overuse_secs, 125);
        assert_eq!(row.eye_exercise, 1);
    }

    #[tokio::test]
    async fn early_end_is_durable_before_returning() {
        let store = Arc::new(MockStore::default());
        let mut controller = controller(store.clone(), 60);
        controller.hydrate().await;

        controller.start(t(0));
        controller.tick(t(60));
        controller.respond(BreakChoice::EyeExercise, t(60));
        controller.record_early_end(BreakChoice::EyeExercise).await;

        let row = store.row("u1", day()).unwrap();
        assert_eq!(row.eye_exercise, 1);
        assert_eq!(row.eye_exercise_early_end, 1);
        // The aggregate count does not include the early-end marker.
        assert_eq!(row.sessions_count, 1);
    }

    #[tokio::test]
    async fn increments_accumulate_across_breaks() {
        let store = Arc::new(MockStore::default());
        let mut controller = controller(store.clone(), 60);
        controller.hydrate().await;

        controller.start(t(0));
        controller.tick(t(60));
        controller.respond(BreakChoice::Skip, t(60));
        // Skip restarted the timer at zero.
        assert_eq!(controller.state().mode, TimerMode::Running);

        controller.tick(t(120));
        controller.respond(BreakChoice::CloseEyes, t(120));
        controller.wait_for_flush().await;

        let row = store.row("u1", day()).unwrap();
        assert_eq!(row.screen_time_secs, 120);
        assert_eq!(row.skip, 1);
        assert_eq!(row.eye_close, 1);
        assert_eq!(row.sessions_count, 2);
    }

    #[tokio::test]
    async fn reset_commits_the_partial_session() {
        let store = Arc::new(MockStore::default());
        let mut controller = controller(store.clone(), 1800);
        controller.hydrate().await;

        controller.start(t(0));
        let commit = controller.reset(t(90)).unwrap();
        assert_eq!(commit.screen_secs, 90);
        controller.wait_for_flush().await;

        let row = store.row("u1", day()).unwrap();
        assert_eq!(row.screen_time_secs, 90);
        assert_eq!(row.sessions_count, 0);
    }

    #[tokio::test]
    async fn durable_snapshot_restores_and_reprompts_after_a_gap() {
        let store = Arc::new(MockStore::default());
        let registry = WriteRegistry::new(store.clone());
        let durable = Arc::new(MemSnapshots::default());

        struct SharedSnapshots(Arc<MemSnapshots>);
        impl SnapshotStore for SharedSnapshots {
            fn get(&self, key: &str) -> Result<Option<String>> {
                self.0.get(key)
            }
            fn set(&self, key: &str, value: &str) -> Result<()> {
                self.0.set(key, value)
            }
            fn remove(&self, key: &str) -> Result<()> {
                self.0.remove(key)
            }
        }

        let make = |registry: Arc<WriteRegistry>, durable: Arc<MemSnapshots>| {
            SessionController::new(
                registry,
                Box::new(SharedSnapshots(durable)),
                Arc::new(MemoryHandoff::new()),
                BreakPolicy::new(60),
                "u1",
                "User",
                day(),
            )
        };

        let mut first = make(registry.clone(), durable.clone());
        first.start(t(0));
        first.autosave(t(30));

        // Process restart: a new controller over the same durable store.
        let mut second = make(registry, durable);
        let due = second.mount(t(90)).unwrap();
        // The unloaded minute counted; the missed boundary prompts now.
        assert_eq!(second.elapsed_secs(t(90)), 90);
        assert_eq!(due.prompt_at_secs, 60);
        assert_eq!(due.overuse_added, 0);
    }

    #[tokio::test]
    async fn handoff_survives_an_activity_detour() {
        let store = Arc::new(MockStore::default());
        let mut controller = controller(store, 1800);

        controller.start(t(0));
        controller.stash_handoff(t(100));
        let resumed = controller.mount(t(150));
        assert!(resumed.is_none());
        assert_eq!(controller.state().mode, TimerMode::Running);
        assert_eq!(controller.elapsed_secs(t(150)), 150);

        // Handoffs are single-use; a second mount finds nothing and
        // leaves the state alone.
        assert!(controller.mount(t(160)).is_none());
        assert_eq!(controller.elapsed_secs(t(160)), 160);
    }

    #[tokio::test]
    async fn rolling_the_date_rekeys_the_counters() {
        let store = Arc::new(MockStore::default());
        let mut controller = controller(store.clone(), 1800);
        controller.hydrate().await;

        let tomorrow = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(!controller.roll_date(day()));
        assert!(controller.roll_date(tomorrow));
        controller.hydrate().await;

        controller.start(t(0));
        controller.reset(t(60));
        controller.wait_for_flush().await;

        assert!(store.row("u1", day()).is_none());
        assert_eq!(store.row("u1", tomorrow).unwrap().screen_time_secs, 60);
    }
}
