//! Remote counters store client.
//!
//! The core only needs a minimal contract from the backing store:
//! select by `(user_id, date)`, upsert with that composite conflict
//! target, and a row count for the days-of-use figure. [`RestStore`]
//! implements it against a PostgREST-style endpoint; tests substitute an
//! in-memory double.

use crate::libs::config::ServerConfig;
use crate::libs::counters::DailyCounters;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, StatusCode,
};
use thiserror::Error;

const TABLE_PATH: &str = "rest/v1/daily_tracking";
const CONFLICT_TARGET: &str = "user_id,date";
const API_KEY_HEADER: &str = "apikey";
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(StatusCode),
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// Minimal async contract for the remote row store.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn fetch(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyCounters>, StoreError>;
    async fn upsert(&self, counters: &DailyCounters) -> Result<(), StoreError>;
    /// Number of days the user has any recorded row for.
    async fn days_of_use(&self, user_id: &str) -> Result<u32, StoreError>;
    /// Every stored row for the user, for stats review and export.
    async fn fetch_all(&self, user_id: &str) -> Result<Vec<DailyCounters>, StoreError>;
}

pub struct RestStore {
    client: Client,
    api_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.api_url, TABLE_PATH)
    }

    fn auth_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(&self.api_key)?);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", self.api_key))?);
        Ok(headers)
    }
}

#[async_trait]
impl CounterStore for RestStore {
    async fn fetch(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyCounters>, StoreError> {
        let res = self
            .client
            .get(self.table_url())
            .headers(self.auth_headers()?)
            .query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("date", format!("eq.{}", date.format("%Y-%m-%d"))),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(StoreError::Status(res.status()));
        }
        let mut rows: Vec<DailyCounters> = res.json().await?;
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }

    async fn upsert(&self, counters: &DailyCounters) -> Result<(), StoreError> {
        let mut headers = self.auth_headers()?;
        headers.insert("Prefer", HeaderValue::from_static(UPSERT_PREFER));

        let res = self
            .client
            .post(self.table_url())
            .headers(headers)
            .query(&[("on_conflict", CONFLICT_TARGET)])
            .json(&[counters])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(StoreError::Status(res.status()));
        }
        Ok(())
    }

    async fn days_of_use(&self, user_id: &str) -> Result<u32, StoreError> {
        let res = self
            .client
            .get(self.table_url())
            .headers(self.auth_headers()?)
            .query(&[("user_id", format!("eq.{}", user_id)), ("select", "date".to_string())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(StoreError::Status(res.status()));
        }
        let rows: Vec<serde_json::Value> = res.json().await?;
        Ok(rows.len() as u32)
    }

    async fn fetch_all(&self, user_id: &str) -> Result<Vec<DailyCounters>, StoreError> {
        let res = self
            .client
            .get(self.table_url())
            .headers(self.auth_headers()?)
            .query(&[("user_id", format!("eq.{}", user_id)), ("order", "date.asc".to_string())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(StoreError::Status(res.status()));
        }
        Ok(res.json().await?)
    }
}
