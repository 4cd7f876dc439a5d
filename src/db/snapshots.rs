//! Durable key→string storage backing the timer persistence bridge.

use crate::db::db::Db;
use crate::libs::snapshot::SnapshotStore;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};

const SCHEMA_SNAPSHOTS: &str = "CREATE TABLE IF NOT EXISTS snapshots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);";
const UPSERT: &str = "INSERT INTO snapshots (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const SELECT_BY_KEY: &str = "SELECT value FROM snapshots WHERE key = ?1";
const DELETE_BY_KEY: &str = "DELETE FROM snapshots WHERE key = ?1";

pub struct Snapshots {
    conn: Mutex<Connection>,
}

impl Snapshots {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        db.conn.execute(SCHEMA_SNAPSHOTS, [])?;
        Ok(Snapshots { conn: Mutex::new(db.conn) })
    }
}

impl SnapshotStore for Snapshots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(SELECT_BY_KEY, [key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.lock().execute(UPSERT, [key, value])?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.lock().execute(DELETE_BY_KEY, [key])?;
        Ok(())
    }
}
