//! Daily usage counters, one row per user per calendar day.
//!
//! The wire format mirrors the remote table: session counts as plain
//! integers, screen time and overuse as `HH:MM:SS` interval strings.
//! The day boundary uses a fixed reference timezone, not the machine's
//! local zone, so traveling or DST cannot split a day in two.

use crate::libs::breaks::BreakChoice;
use crate::libs::timer::SessionCommit;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEZONE: &str = "Asia/Hong_Kong";

/// Converts seconds into an `HH:MM:SS` interval string.
pub fn seconds_to_interval(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Parses an `HH:MM:SS` interval string. Anything malformed reads as 0
/// rather than an error; counters fail soft.
pub fn interval_to_seconds(interval: &str) -> u64 {
    let parts: Vec<&str> = interval.split(':').collect();
    if parts.len() != 3 {
        return 0;
    }
    let hours: u64 = parts[0].parse().unwrap_or(0);
    let minutes: u64 = parts[1].parse().unwrap_or(0);
    let seconds: u64 = parts[2].parse().unwrap_or(0);
    hours * 3600 + minutes * 60 + seconds
}

/// Today's date in the reference timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Serde codec for the interval-string counter fields.
mod interval_secs {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(secs: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::seconds_to_interval(*secs))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(super::interval_to_seconds).unwrap_or(0))
    }
}

/// One remote counters row, keyed by `(user_id, date)`. All counters
/// are monotonically non-decreasing within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounters {
    pub user_id: String,
    pub username: String,
    pub date: NaiveDate,
    pub days_of_use: u32,
    #[serde(rename = "daily_screen_time", with = "interval_secs")]
    pub screen_time_secs: u64,
    #[serde(rename = "daily_sessions_count")]
    pub sessions_count: u32,
    #[serde(rename = "daily_sessions_eye_exercise")]
    pub eye_exercise: u32,
    #[serde(rename = "daily_sessions_eye_exercise_early_end")]
    pub eye_exercise_early_end: u32,
    #[serde(rename = "daily_sessions_eye_close")]
    pub eye_close: u32,
    #[serde(rename = "daily_sessions_eye_close_early_end")]
    pub eye_close_early_end: u32,
    #[serde(rename = "daily_sessions_skip")]
    pub skip: u32,
    #[serde(rename = "daily_overuse_time", with = "interval_secs")]
    pub overuse_secs: u64,
}

impl DailyCounters {
    /// A fresh zeroed row for the given day.
    pub fn new(user_id: &str, username: &str, date: NaiveDate, days_of_use: u32) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            date,
            days_of_use,
            screen_time_secs: 0,
            sessions_count: 0,
            eye_exercise: 0,
            eye_exercise_early_end: 0,
            eye_close: 0,
            eye_close_early_end: 0,
            skip: 0,
            overuse_secs: 0,
        }
    }

    /// Folds a finished session's totals into the day.
    pub fn apply_commit(&mut self, commit: SessionCommit) {
        self.screen_time_secs += commit.screen_secs;
        self.overuse_secs += commit.overuse_secs;
    }

    /// Bumps the counter for the chosen break activity. The aggregate
    /// session count is derived, never set directly.
    pub fn record_choice(&mut self, choice: BreakChoice) {
        match choice {
            BreakChoice::EyeExercise => self.eye_exercise += 1,
            BreakChoice::CloseEyes => self.eye_close += 1,
            BreakChoice::Skip => self.skip += 1,
        }
        self.recompute_sessions_count();
    }

    /// Records a user-initiated early end of a guided activity. Skip has
    /// no guided flow, so nothing to end early.
    pub fn record_early_end(&mut self, choice: BreakChoice) {
        match choice {
            BreakChoice::EyeExercise => self.eye_exercise_early_end += 1,
            BreakChoice::CloseEyes => self.eye_close_early_end += 1,
            BreakChoice::Skip => {}
        }
    }

    fn recompute_sessions_count(&mut self) {
        self.sessions_count = self.eye_exercise + self.eye_close + self.skip;
    }
}
