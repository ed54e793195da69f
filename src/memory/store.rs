// src/memory/store.rs — Durable key-value storage

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::schema;
use crate::infra::errors::PrepError;

/// String blobs under fixed keys; the persistence bridge's only dependency.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, PrepError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrepError>;
    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool, PrepError>;
    /// Write several entries; either all of them land or none do.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), PrepError>;
}

const UPSERT_SQL: &str = "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, PrepError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        schema::run_migrations(&conn)?;
        tracing::debug!("Opened session store at {}", path.display());
        Ok(Self::new(conn))
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, PrepError> {
        let conn = Connection::open_in_memory()?;
        schema::run_migrations(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn keys(&self) -> Result<Vec<String>, PrepError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key")?;
        let rows = stmt.query_map([], |r| r.get(0))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrepError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrepError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(UPSERT_SQL, params![key, value, now])?;
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), PrepError> {
        let now = Utc::now().to_rfc3339();
        // Dropping an uncommitted transaction rolls it back.
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL)?;
            for (key, value) in entries {
                stmt.execute(params![key, value, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, PrepError> {
        let n = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrepError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrepError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, PrepError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.remove(key).is_some())
    }

    fn set_many(&self, batch: &[(&str, &str)]) -> Result<(), PrepError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        for (key, value) in batch {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}
