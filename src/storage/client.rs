use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use log::info;
use serde_json::Value;
use crate::error::{Result, VaultKeyError};
use crate::storage::backend::KeyValueBackend;

/// Sqlite-backed key-value store. Values are kept as JSON text.
pub struct SqliteBackend {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(&path)?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        info!("Key-value store ready");

        Ok(SqliteBackend {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultKeyError::StoreUnavailable("sqlite connection poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueBackend for SqliteBackend {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached("SELECT value FROM kv WHERE key = ?1")?;
        let raw: Option<String> = stmt.query_row([key], |row| row.get(0)).optional()?;
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, key: &str, value: Value) -> Result<()> {
        let text = serde_json::to_string(&value)?;
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)")?;
        stmt.execute(params![key, text])?;
        Ok(())
    }
}
