//! Provides the SQLite-backed key-value store holding the bot's global settings.
//! Settings live under a fixed cog identifier, so there is no per-guild or per-user scoping.

use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

/// Namespace under which this cog's settings are stored.
pub const COG_IDENTIFIER: i64 = 9876543210;
/// Field name of the stored Gemini API key.
pub const API_KEY_FIELD: &str = "api_key";

/// Errors that can occur while reading or writing the configuration store.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error reported by SQLite.
    #[error("Database failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A previous holder of the connection panicked.
    #[error("Database connection lock was poisoned")]
    Poisoned,
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Global key-value settings for the cog.
pub struct ConfigStore {
    conn: Mutex<Connection>,
}

impl ConfigStore {
    /// Opens (or creates) the store at `path` and ensures the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        info!("Opening configuration store at {}", path.as_ref().display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a throwaway store, used by tests.
    pub fn open_in_memory() -> DatabaseResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DatabaseResult<Self> {
        create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Reads a field, returning `None` if it has never been set.
    pub fn get(&self, field: &str) -> DatabaseResult<Option<String>> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM global_config WHERE identifier = ?1 AND field = ?2",
                params![COG_IDENTIFIER, field],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();
        debug!("Read field '{}' (present: {})", field, value.is_some());
        Ok(value)
    }

    /// Writes a field, replacing any previous value.
    pub fn set(&self, field: &str, value: &str) -> DatabaseResult<()> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO global_config (identifier, field, value) VALUES (?1, ?2, ?3)",
            params![COG_IDENTIFIER, field, value],
        )?;
        debug!("Wrote field '{}'", field);
        Ok(())
    }

    /// The stored Gemini API key, if one has been set.
    pub fn api_key(&self) -> DatabaseResult<Option<String>> {
        self.get(API_KEY_FIELD)
    }

    pub fn set_api_key(&self, key: &str) -> DatabaseResult<()> {
        self.set(API_KEY_FIELD, key)
    }
}

/// Creates the `global_config` table if it doesn't exist.
fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS global_config (
            identifier INTEGER NOT NULL,
            field TEXT NOT NULL,
            value TEXT,
            PRIMARY KEY (identifier, field)
        )",
        [],
    )?;
    Ok(())
}
