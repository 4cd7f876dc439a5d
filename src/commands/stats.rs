//! Daily usage statistics command.
//!
//! Reads counters from the remote store and renders them as console
//! tables. Defaults to today in the configured reference timezone.

use crate::{
    api::store::RestStore,
    libs::{
        config::Config,
        counters::today_in,
        messages::Message,
        view::View,
    },
    msg_bail_anyhow, msg_print,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Date to display (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Show the break choice breakdown as well
    #[arg(short, long)]
    breaks: bool,

    /// Show every recorded day instead of a single date
    #[arg(long)]
    history: bool,
}

pub async fn cmd(args: StatsArgs) -> Result<()> {
    let config = Config::read()?;
    let Some(server) = config.server else {
        msg_bail_anyhow!(Message::Custom("Server is not configured, run `okulo init` first".to_string()));
    };
    let timer = config.timer.unwrap_or_default();
    let store = RestStore::new(&server);

    use crate::api::store::CounterStore;

    if args.history {
        let days = store.fetch_all(&server.user_id).await?;
        if days.is_empty() {
            msg_print!(Message::Custom("No recorded days yet".to_string()));
            return Ok(());
        }
        View::history(&days).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        return Ok(());
    }

    let date = args.date.unwrap_or_else(|| today_in(timer.reference_timezone()));
    msg_print!(Message::StatsHeader(date.format("%Y-%m-%d").to_string()));

    match store.fetch(&server.user_id, date).await? {
        Some(counters) => {
            View::day(&counters).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            if args.breaks {
                View::breaks(&counters).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            }
        }
        None => msg_print!(Message::StatsNotFoundForDate(date.format("%Y-%m-%d").to_string())),
    }

    Ok(())
}
