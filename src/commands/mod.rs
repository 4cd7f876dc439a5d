pub mod export;
pub mod init;
pub mod stats;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Run the session timer with break reminders")]
    Watch(watch::WatchArgs),
    #[command(about = "Display daily usage statistics")]
    Stats(stats::StatsArgs),
    #[command(about = "Export tracking data")]
    Export(export::ExportArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Stats(args) => stats::cmd(args).await,
            Commands::Export(args) => export::cmd(args).await,
        }
    }
}
