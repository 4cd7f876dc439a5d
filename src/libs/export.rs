//! Export of daily tracking counters for external analysis or backup.
//!
//! Supports CSV (for spreadsheets) and pretty-printed JSON (for
//! programmatic use). A single day or the full history can be exported;
//! rows come from the remote store, so pending local writes should be
//! flushed first.

use crate::api::store::CounterStore;
use crate::libs::counters::{seconds_to_interval, DailyCounters};
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_success};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values for spreadsheet tools.
    Csv,
    /// Pretty-printed JSON preserving the wire field names.
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ExportData {
    /// A single day's counters.
    Day,
    /// Every recorded day for the user.
    History,
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// When no output path is given, a timestamped default such as
    /// `okulo_export_20250115_143022.csv` is used.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let default_name = format!("okulo_export_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let extension = match format {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        };
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(format!("{}.{}", default_name, extension)));

        Self { format, output_path }
    }

    pub async fn export(&self, store: &dyn CounterStore, data: ExportData, user_id: &str, date: NaiveDate) -> Result<()> {
        let rows = match data {
            ExportData::Day => match store.fetch(user_id, date).await? {
                Some(row) => vec![row],
                None => Vec::new(),
            },
            ExportData::History => store.fetch_all(user_id).await?,
        };

        if rows.is_empty() {
            msg_bail_anyhow!(Message::ExportNoData);
        }

        match self.format {
            ExportFormat::Csv => self.write_csv(&rows)?,
            ExportFormat::Json => self.write_json(&rows)?,
        }

        msg_success!(Message::ExportSuccess(self.output_path.display().to_string()));
        Ok(())
    }

    fn write_csv(&self, rows: &[DailyCounters]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record([
            "Date",
            "Screen Time",
            "Overuse",
            "Sessions",
            "Eye Exercise",
            "Exercise Ended Early",
            "Close Eyes",
            "Close Ended Early",
            "Skipped",
            "Days Of Use",
        ])?;

        for row in rows {
            wtr.write_record([
                row.date.format("%Y-%m-%d").to_string(),
                seconds_to_interval(row.screen_time_secs),
                seconds_to_interval(row.overuse_secs),
                row.sessions_count.to_string(),
                row.eye_exercise.to_string(),
                row.eye_exercise_early_end.to_string(),
                row.eye_close.to_string(),
                row.eye_close_early_end.to_string(),
                row.skip.to_string(),
                row.days_of_use.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_json(&self, rows: &[DailyCounters]) -> Result<()> {
        let json = serde_json::to_string_pretty(rows)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }
}
