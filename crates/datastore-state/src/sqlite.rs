use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::{
    backend::{BackendError, PreferenceBackend},
    value::RawValue,
};

/// A shared SQLite connection holding any number of preference spaces.
///
/// All spaces live in one `preferences` table keyed by `(space, key)`. Values are stored as the
/// JSON encoding of [`RawValue`], so the kind survives a round trip.
#[derive(Clone)]
pub struct SqliteConnection(Arc<Mutex<rusqlite::Connection>>);

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection").finish()
    }
}

impl SqliteConnection {
    /// Opens (or creates) the database file at `path`, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!(?path, "Opening preference database");
        let connection = rusqlite::Connection::open(path)?;

        // The pragma returns the resulting mode as a row, so it can't go through `execute`.
        let _mode: String =
            connection.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;

        Self::initialize(connection)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, BackendError> {
        Self::initialize(rusqlite::Connection::open_in_memory()?)
    }

    fn initialize(connection: rusqlite::Connection) -> Result<Self, BackendError> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                space TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (space, key)
            );",
            [],
        )?;

        Ok(SqliteConnection(Arc::new(Mutex::new(connection))))
    }

    /// Returns a backend for the space called `name` on this connection.
    pub fn space(&self, name: impl Into<String>) -> SqliteBackend {
        SqliteBackend {
            connection: self.clone(),
            space: name.into(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, BackendError> {
        self.0
            .lock()
            .map_err(|_| BackendError::Poisoned("sqlite connection"))
    }
}

/// A preference space persisted in SQLite. Obtained from [`SqliteConnection::space`].
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    connection: SqliteConnection,
    space: String,
}

impl PreferenceBackend for SqliteBackend {
    fn name(&self) -> &str {
        &self.space
    }

    fn get(&self, key: &str) -> Result<Option<RawValue>, BackendError> {
        let conn = self.connection.lock()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM preferences WHERE space = ?1 AND key = ?2",
                params![self.space, key],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: RawValue) -> Result<(), BackendError> {
        let value = serde_json::to_string(&value)?;

        let mut conn = self.connection.lock()?;
        let transaction = conn.transaction()?;
        transaction.execute(
            "INSERT OR REPLACE INTO preferences (space, key, value) VALUES (?1, ?2, ?3)",
            params![self.space, key, value],
        )?;
        transaction.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, BackendError> {
        let mut conn = self.connection.lock()?;
        let transaction = conn.transaction()?;
        let removed = transaction.execute(
            "DELETE FROM preferences WHERE space = ?1 AND key = ?2",
            params![self.space, key],
        )?;
        transaction.commit()?;
        Ok(removed > 0)
    }

    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        let conn = self.connection.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM preferences WHERE space = ?1 AND key = ?2)",
            params![self.space, key],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let conn = self.connection.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM preferences WHERE space = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![self.space], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    fn clear(&self) -> Result<(), BackendError> {
        let conn = self.connection.lock()?;
        conn.execute(
            "DELETE FROM preferences WHERE space = ?1",
            params![self.space],
        )?;
        Ok(())
    }
}
