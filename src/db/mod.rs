pub mod db;
pub mod snapshots;
