use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;
use tracing::debug;

/// String-valued key-value store on top of SQLite
///
/// Whole values are written at once, so there's no partial-update story to
/// worry about: a `set` either replaces the row or fails.
pub struct CacheManager {
    conn: Connection,
}

impl CacheManager {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref())?;

        // Initialize schema on first run
        Self::init_schema(&conn)?;
        debug!("Opened key-value store at {}", db_path.as_ref().display());

        Ok(Self { conn })
    }

    /// Throwaway store, mostly for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Read the value stored under `key`, if any
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Store `value` under `key`, replacing whatever was there
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        debug!("Wrote {} bytes under key '{}'", value.len(), key);
        Ok(())
    }

    /// Remove `key`. Returns true if something was deleted.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    /// Unix timestamp of the last write to `key`
    pub fn updated_at(&self, key: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }
}
