//! Storage adapter over the local key-value store.
//!
//! # Responsibility
//! - Provide a narrow `KeyValueStore` contract and its SQLite implementation.
//! - Bind one durable key to a JSON document (`Storage`) with load/save,
//!   per-field get/put, and reset.
//!
//! # Invariants
//! - `Storage` methods never return errors. Read failures degrade to "no
//!   persisted state"; every failure, read or write, is reported only as the
//!   configured `FailurePolicy` allows.
//! - Every write serializes the full document, so the last write wins.
//! - Stored values are user data; log lines carry only key names and error
//!   text.

use crate::db::DbError;
use crate::settings::FailurePolicy;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure inside a key-value store backend.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Encode(serde_json::Error),
    /// Failure reported by a `KeyValueStore` that is not SQLite-backed
    /// (platform preferences, a remote store), described as text.
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode stored document: {err}"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Raw string key-value persistence.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// SQLite-backed store over the `kv_entries` table.
///
/// Owns its connection so a controller can hold it for the whole session.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// One durable key holding a JSON object.
pub struct Storage<'s, S: KeyValueStore> {
    store: &'s S,
    key: &'s str,
    policy: FailurePolicy,
}

impl<'s, S: KeyValueStore> Storage<'s, S> {
    pub fn new(store: &'s S, key: &'s str, policy: FailurePolicy) -> Self {
        Self { store, key, policy }
    }

    pub fn key(&self) -> &str {
        self.key
    }

    /// Returns the stored object, or an empty map when nothing usable is
    /// stored.
    pub fn load(&self) -> Map<String, Value> {
        let raw = match self.store.read(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Map::new(),
            Err(err) => {
                self.absorb("storage_load", &err);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                self.absorb("storage_load", &"stored document is not a JSON object");
                Map::new()
            }
            Err(err) => {
                self.absorb("storage_load", &err);
                Map::new()
            }
        }
    }

    /// Serializes and writes `document` over the stored entry.
    pub fn save<T: Serialize + ?Sized>(&self, document: &T) {
        let result = serde_json::to_string(document)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.write(self.key, &raw));
        if let Err(err) = result {
            self.absorb("storage_save", &err);
        }
    }

    /// Reads one field of the stored object.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.load().remove(field)
    }

    /// Sets one field of the stored object, keeping the others.
    pub fn put(&self, field: &str, value: impl Into<Value>) {
        let mut document = self.load();
        document.insert(field.to_string(), value.into());
        self.save(&document);
    }

    /// Removes the durable entry.
    pub fn reset(&self) {
        if let Err(err) = self.store.remove(self.key) {
            self.absorb("storage_reset", &err);
        }
    }

    fn absorb(&self, event: &str, err: &dyn Display) {
        match self.policy {
            FailurePolicy::Log => warn!(
                "event={event} module=storage status=error key={} error={}",
                self.key, err
            ),
            FailurePolicy::Silent => {}
        }
    }
}
