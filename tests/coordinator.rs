#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use okulo::api::store::{CounterStore, StoreError};
    use okulo::libs::coordinator::{counter_key, WriteRegistry};
    use okulo::libs::counters::DailyCounters;
    use parking_lot::Mutex;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::Duration;

    /// In-memory store double recording every upsert it receives.
    #[derive(Default)]
    struct MockStore {
        writes: Mutex<Vec<DailyCounters>>,
        fail: AtomicBool,
        write_delay: Option<Duration>,
    }

    impl MockStore {
        fn slow(delay_ms: u64) -> Self {
            MockStore {
                write_delay: Some(Duration::from_millis(delay_ms)),
                ..Default::default()
            }
        }

        fn written(&self) -> Vec<DailyCounters> {
            self.writes.lock().clone()
        }
    }

    #[async_trait]
    impl CounterStore for MockStore {
        async fn fetch(&self, _user_id: &str, _date: NaiveDate) -> Result<Option<DailyCounters>, StoreError> {
            Ok(None)
        }

        async fn upsert(&self, counters: &DailyCounters) -> Result<(), StoreError> {
            if let Some(delay) = self.write_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Status(StatusCode::INTERNAL_SERVER_ERROR));
            }
            self.writes.lock().push(counters.clone());
            Ok(())
        }

        async fn days_of_use(&self, _user_id: &str) -> Result<u32, StoreError> {
            Ok(0)
        }

        async fn fetch_all(&self, _user_id: &str) -> Result<Vec<DailyCounters>, StoreError> {
            Ok(self.written())
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn row(sessions: u32) -> DailyCounters {
        let mut counters = DailyCounters::new("u1", "User", day(), 1);
        counters.sessions_count = sessions;
        counters
    }

    #[tokio::test]
    async fn burst_of_requests_coalesces_to_the_last_snapshot() {
        let store = Arc::new(MockStore::slow(50));
        let registry = WriteRegistry::new(store.clone());
        let key = counter_key("u1", day());

        for sessions in 1..=5 {
            registry.request_write(&key, row(sessions));
        }
        registry.wait_for_flush(&key).await;

        let writes = store.written();
        // Intermediate snapshots are dropped, the final one is durable.
        assert!(writes.len() <= 2, "expected coalesced writes, got {}", writes.len());
        assert_eq!(writes.last().unwrap().sessions_count, 5);
        assert!(!registry.pending(&key));
    }

    #[tokio::test]
    async fn latest_reflects_the_newest_request() {
        let store = Arc::new(MockStore::default());
        let registry = WriteRegistry::new(store);
        let key = counter_key("u1", day());

        assert!(registry.latest(&key).is_none());
        registry.request_write(&key, row(2));
        assert_eq!(registry.latest(&key).unwrap().sessions_count, 2);
        registry.request_write(&key, row(3));
        assert_eq!(registry.latest(&key).unwrap().sessions_count, 3);
    }

    #[tokio::test]
    async fn failed_write_is_dropped_not_retried() {
        let store = Arc::new(MockStore::default());
        store.fail.store(true, Ordering::SeqCst);
        let registry = WriteRegistry::new(store.clone());
        let key = counter_key("u1", day());

        registry.request_write(&key, row(1));
        // Resolves despite the failure; durability is not a deadlock.
        registry.wait_for_flush(&key).await;
        assert!(store.written().is_empty());
        // Local state survives as the base for the next mutation.
        assert_eq!(registry.latest(&key).unwrap().sessions_count, 1);

        store.fail.store(false, Ordering::SeqCst);
        registry.request_write(&key, row(2));
        registry.wait_for_flush(&key).await;
        assert_eq!(store.written().last().unwrap().sessions_count, 2);
    }

    #[tokio::test]
    async fn reconcile_prefers_local_state_while_a_write_is_pending() {
        let store = Arc::new(MockStore::default());
        let registry = WriteRegistry::new(store);
        let key = counter_key("u1", day());

        // The spawned flush has not run yet on a current-thread
        // runtime, so the write is still pending here.
        registry.request_write(&key, row(4));
        let resolved = registry.reconcile_fetch(&key, row(0));
        assert_eq!(resolved.sessions_count, 4);

        registry.wait_for_flush(&key).await;
        let resolved = registry.reconcile_fetch(&key, row(9));
        assert_eq!(resolved.sessions_count, 9);
        assert_eq!(registry.latest(&key).unwrap().sessions_count, 9);
    }

    #[tokio::test]
    async fn keys_are_isolated_per_user_and_day() {
        let store = Arc::new(MockStore::default());
        let registry = WriteRegistry::new(store);
        let other_day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        let key_a = counter_key("u1", day());
        let key_b = counter_key("u1", other_day);
        assert_ne!(key_a, key_b);
        assert_ne!(counter_key("u1", day()), counter_key("u2", day()));

        registry.request_write(&key_a, row(1));
        assert!(registry.latest(&key_b).is_none());
    }
}
