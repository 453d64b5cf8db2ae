use datastore_state::{BackendError, RawKind};
use thiserror::Error;

/// Errors that can occur when working with a [`PreferenceStore`](crate::PreferenceStore).
///
/// Only the `try_` accessors return these; the plain accessors log them and carry on.
#[derive(Debug, Error)]
pub enum DataStoreError {
    /// The backend failed to read or write.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Failed to serialize/deserialize a JSON-backed value.
    #[error("Failed to serialize/deserialize value: {0}")]
    Json(#[from] serde_json::Error),

    /// The value has no primitive representation in the backend.
    #[error("Unsupported raw value type: {kind}")]
    UnsupportedValue {
        /// Description of the rejected value.
        kind: &'static str,
    },

    /// A JSON-backed read found a primitive entry that is not a string.
    #[error("Entry '{key}' holds a {kind} value, expected a JSON string")]
    NotAString {
        /// The key that was read.
        key: String,
        /// The kind actually stored.
        kind: RawKind,
    },
}
