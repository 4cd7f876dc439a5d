//! # Okulo - Screen Time and Eye Break Tracking
//!
//! A command-line utility for tracking screen time, prompting regular
//! eye breaks, and keeping daily usage counters in sync with a remote
//! store.
//!
//! ## Features
//!
//! - **Session Timer**: Timestamp-derived elapsed time immune to tick
//!   drift, with pause/resume and execution-gap catch-up
//! - **Break Reminders**: Configurable interval with overuse accounting
//!   for ignored prompts
//! - **Guided Activities**: An eye exercise sequence and a close-eyes
//!   rest countdown
//! - **Counter Sync**: Write-coalesced upserts of daily counters with
//!   local-first reads
//! - **Crash Recovery**: Versioned timer snapshots restored on startup
//! - **Data Export**: CSV and JSON export of the tracking history
//!
//! ## Usage
//!
//! ```rust,no_run
//! use okulo::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
