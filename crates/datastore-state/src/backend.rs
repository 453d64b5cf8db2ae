use thiserror::Error;

use crate::value::RawValue;

/// An error resulting from operations on a preference backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// An internal unspecified error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A lock guarding backend state was poisoned by a panicking writer.
    #[error("Lock poisoned: {0}")]
    Poisoned(&'static str),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file or its directory could not be prepared.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An internal database error.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// A single named preference space: a flat key-value map over string keys.
///
/// Implementations are responsible for their own synchronization. Each call is an isolated
/// read or write; nothing is batched across calls.
pub trait PreferenceBackend: Send + Sync {
    /// The name of the space this backend stores.
    fn name(&self) -> &str;

    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<RawValue>, BackendError>;

    /// Writes `value` under `key`, replacing any previous value of any kind.
    fn put(&self, key: &str, value: RawValue) -> Result<(), BackendError>;

    /// Removes `key`. Returns whether an entry was present.
    fn remove(&self, key: &str) -> Result<bool, BackendError>;

    /// Returns whether `key` is present.
    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        Ok(self.get(key)?.is_some())
    }

    /// Lists every key in the space, sorted.
    fn keys(&self) -> Result<Vec<String>, BackendError>;

    /// Removes every entry in the space.
    fn clear(&self) -> Result<(), BackendError>;
}
