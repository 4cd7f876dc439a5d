//! Configuration management for the okulo application.
//!
//! Settings live in a JSON file in the platform data directory. Each
//! section is optional so a fresh install works with defaults and users
//! only configure what they need:
//!
//! - **Timer**: break interval, rest duration, autosave cadence, the
//!   reference timezone for the daily counter boundary.
//! - **Server**: the remote counters endpoint and identity the rows
//!   are written under.
//! - **Notifications**: desktop notification and alert-sound toggles.
//!
//! Invalid values never abort: the break interval clamps to its bounds
//! and an unknown timezone falls back to the default, with a warning.

use super::data_storage::DataStorage;
use crate::libs::breaks::{BreakPolicy, MAX_BREAK_INTERVAL_SECS, MIN_BREAK_INTERVAL_SECS};
use crate::libs::counters::DEFAULT_TIMEZONE;
use crate::libs::exercise::{SpeedSettings, REST_DURATION_SECS};
use crate::libs::messages::Message;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use chrono_tz::Tz;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Timer and break-scheduling settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimerConfig {
    /// Minutes of active screen time between break prompts.
    pub break_interval_minutes: u64,
    /// Length of the close-eyes rest countdown in seconds.
    pub rest_duration_secs: u64,
    /// How often a running timer snapshots itself, in seconds.
    pub autosave_interval_secs: u64,
    /// IANA timezone defining the calendar-day boundary for counters.
    pub timezone: String,
    /// Per-direction pace of the exercise tracking moves.
    #[serde(default)]
    pub exercise_speeds: SpeedSettings,
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            break_interval_minutes: 30,
            rest_duration_secs: REST_DURATION_SECS,
            autosave_interval_secs: 5,
            timezone: DEFAULT_TIMEZONE.to_string(),
            exercise_speeds: SpeedSettings::default(),
        }
    }
}

impl TimerConfig {
    /// Break interval in seconds, clamped to the policy bounds with a
    /// warning rather than rejected.
    pub fn break_interval_secs(&self) -> u64 {
        let requested = self.break_interval_minutes * 60;
        let applied = requested.clamp(MIN_BREAK_INTERVAL_SECS, MAX_BREAK_INTERVAL_SECS);
        if applied != requested {
            msg_warning!(Message::BreakIntervalClamped(requested, applied));
        }
        applied
    }

    pub fn break_policy(&self) -> BreakPolicy {
        BreakPolicy::new(self.break_interval_secs())
    }

    /// Parses the configured timezone, falling back to the default on
    /// anything unrecognized.
    pub fn reference_timezone(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            msg_warning!(Message::InvalidTimezone(self.timezone.clone()));
            DEFAULT_TIMEZONE.parse().expect("default timezone is valid")
        })
    }
}

/// Remote counters store connection and row identity.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the counters API.
    pub api_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// User id the counter rows are keyed by.
    pub user_id: String,
    /// Display name stored on the rows.
    pub username: String,
}

/// Desktop notification and sound toggles for break reminders.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NotificationsConfig {
    pub desktop: bool,
    pub sound: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        NotificationsConfig { desktop: true, sound: true }
    }
}

/// Root configuration object. Unconfigured sections are omitted from
/// the JSON file entirely.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationsConfig>,
}

impl Config {
    /// Loads the configuration, falling back to defaults when no file
    /// exists yet.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Interactive setup wizard: pick the sections to configure, then
    /// prompt for each field with the current value as the default.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [
            Message::ConfigModuleTimer.to_string(),
            Message::ConfigModuleServer.to_string(),
            Message::ConfigModuleNotifications.to_string(),
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules)
            .interact()?;

        for &selection in &selected {
            match selection {
                0 => {
                    let default = config.timer.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleTimer);
                    config.timer = Some(TimerConfig {
                        break_interval_minutes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptBreakInterval.to_string())
                            .default(default.break_interval_minutes)
                            .interact_text()?,
                        rest_duration_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRestDuration.to_string())
                            .default(default.rest_duration_secs)
                            .interact_text()?,
                        autosave_interval_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptAutosaveInterval.to_string())
                            .default(default.autosave_interval_secs)
                            .interact_text()?,
                        timezone: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptTimezone.to_string())
                            .default(default.timezone)
                            .interact_text()?,
                        // Tracking-move pace has no prompt; edit the
                        // config file to change it.
                        exercise_speeds: default.exercise_speeds,
                    });
                }
                1 => {
                    let default = config.server.clone().unwrap_or(ServerConfig {
                        api_url: String::new(),
                        api_key: String::new(),
                        user_id: String::new(),
                        username: String::new(),
                    });
                    msg_print!(Message::ConfigModuleServer);
                    config.server = Some(ServerConfig {
                        api_url: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerApiUrl.to_string())
                            .default(default.api_url)
                            .interact_text()?,
                        api_key: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerApiKey.to_string())
                            .default(default.api_key)
                            .interact_text()?,
                        user_id: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerUserId.to_string())
                            .default(default.user_id)
                            .interact_text()?,
                        username: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerUsername.to_string())
                            .default(default.username)
                            .interact_text()?,
                    });
                }
                2 => {
                    let default = config.notifications.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleNotifications);
                    config.notifications = Some(NotificationsConfig {
                        desktop: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptNotificationsEnabled.to_string())
                            .default(default.desktop)
                            .interact()?,
                        sound: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSoundEnabled.to_string())
                            .default(default.sound)
                            .interact()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
