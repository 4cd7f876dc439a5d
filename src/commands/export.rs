//! Tracking data export command.

use crate::{
    api::store::RestStore,
    libs::{
        config::Config,
        counters::today_in,
        export::{ExportData, ExportFormat, Exporter},
        messages::Message,
    },
    msg_bail_anyhow,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// What to export
    #[arg(short, long, value_enum, default_value_t = ExportData::Day)]
    data: ExportData,

    /// Date for single-day export (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Output file path, defaults to a timestamped name
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn cmd(args: ExportArgs) -> Result<()> {
    let config = Config::read()?;
    let Some(server) = config.server else {
        msg_bail_anyhow!(Message::Custom("Server is not configured, run `okulo init` first".to_string()));
    };
    let timer = config.timer.unwrap_or_default();

    let date = args.date.unwrap_or_else(|| today_in(timer.reference_timezone()));
    let store = RestStore::new(&server);

    Exporter::new(args.format, args.output)
        .export(&store, args.data, &server.user_id, date)
        .await
}
