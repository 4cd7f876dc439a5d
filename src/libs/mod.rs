//! Core library modules for the okulo application.
//!
//! Serves as the main entry point for all okulo library components:
//!
//! - **Core Infrastructure**: Configuration, data storage, messaging
//! - **Timer Engine**: Timestamp-derived session timer, break policy,
//!   overuse accounting
//! - **Synchronization**: Write-coalescing registry for the remote
//!   daily counters
//! - **Persistence**: Versioned timer snapshots with fail-soft restore
//! - **User Interface**: Console rendering, alerts, guided activities,
//!   data export

pub mod breaks;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod counters;
pub mod data_storage;
pub mod exercise;
pub mod export;
pub mod messages;
pub mod notify;
pub mod session;
pub mod snapshot;
pub mod timer;
pub mod view;
