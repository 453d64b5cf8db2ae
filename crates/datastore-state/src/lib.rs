#![doc = include_str!("../README.md")]

/// The backend trait implemented by every preference space.
pub mod backend;

/// Selecting and opening backends.
pub mod configuration;

/// In-memory backend.
pub mod memory;

/// SQLite backend.
pub mod sqlite;

/// Primitive values understood by every backend.
pub mod value;

pub use backend::{BackendError, PreferenceBackend};
pub use configuration::{
    Backends, SpaceNames, StoreConfiguration, DEFAULT_APP_SETTINGS_NAME, PREFERENCES_NAME,
};
pub use memory::MemoryBackend;
pub use sqlite::{SqliteBackend, SqliteConnection};
pub use value::{RawKind, RawValue};
