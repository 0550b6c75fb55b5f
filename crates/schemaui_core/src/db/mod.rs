//! On-disk home of the designer's snapshot and flag documents.
//!
//! A single SQLite file holds the `kv_entries` table that
//! `SqliteKeyValueStore` reads and writes. This module opens that file (or an
//! in-memory stand-in for tests) and brings its table layout up to date.
//!
//! The layout version lives in `PRAGMA user_version`. A file stamped by a
//! newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the state database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file's layout version is ahead of every migration this build
    /// ships.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "state store sqlite error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "state store layout v{found} was written by a newer build; this build reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
