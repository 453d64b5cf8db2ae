//! The preference store facade.

use std::sync::Arc;

use datastore_state::{
    MemoryBackend, PreferenceBackend, RawValue, SpaceNames, StoreConfiguration,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    finite::has_non_finite_float, folder_name, raw::raw_from_json, DataStoreError, Key,
    FOLDER_SEPARATOR,
};

/// One of the two preference spaces of a [`PreferenceStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Space {
    /// Application settings, typically edited from a settings screen.
    AppSettings,
    /// Everything else. All reads, enumeration and removal target this space.
    #[default]
    Data,
}

impl Space {
    /// Picks the space from an "is editing app settings" flag.
    pub fn from_app_settings_flag(editing_app_settings: bool) -> Self {
        if editing_app_settings {
            Space::AppSettings
        } else {
            Space::Data
        }
    }
}

/// Typed, namespaced access to a pair of preference spaces.
///
/// The plain accessors never fail: storage, encoding and decoding errors are logged and the
/// call degrades to "no effect", `false`, an empty list or the default value. Each fallible
/// accessor has a `try_` counterpart that returns the [`DataStoreError`] instead.
///
/// Reads, containment checks, enumeration and removal always target [`Space::Data`]. Only the
/// raw writers and [`get_raw`](Self::get_raw) take an explicit [`Space`].
pub struct PreferenceStore {
    app_settings: Arc<dyn PreferenceBackend>,
    data: Arc<dyn PreferenceBackend>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("app_settings", &self.app_settings.name())
            .field("data", &self.data.name())
            .finish()
    }
}

impl PreferenceStore {
    /// Creates a store over two already opened backends.
    pub fn new(app_settings: Arc<dyn PreferenceBackend>, data: Arc<dyn PreferenceBackend>) -> Self {
        PreferenceStore { app_settings, data }
    }

    /// Opens the backends described by `configuration`.
    pub fn open(
        configuration: &StoreConfiguration,
        names: &SpaceNames,
    ) -> Result<Self, DataStoreError> {
        let backends = configuration.open(names)?;
        debug!(?configuration, ?names, "Opened preference store");
        Ok(Self::new(backends.app_settings, backends.data))
    }

    /// Creates a store held entirely in memory, using the default space names.
    pub fn in_memory() -> Self {
        let names = SpaceNames::default();
        Self::new(
            Arc::new(MemoryBackend::new(names.app_settings)),
            Arc::new(MemoryBackend::new(names.data)),
        )
    }

    /// Returns the backend holding `space`.
    pub fn backend(&self, space: Space) -> &dyn PreferenceBackend {
        match space {
            Space::AppSettings => self.app_settings.as_ref(),
            Space::Data => self.data.as_ref(),
        }
    }

    // Raw values

    /// Writes a primitive value into `space`. Failures are logged and swallowed.
    pub fn set_raw(&self, key: &str, value: impl Into<RawValue>, space: Space) {
        let value = value.into();
        if let Err(e) = self.try_set_raw(key, value.clone(), space) {
            warn!(key, ?value, ?space, error = %e, "Failed to write raw preference");
        }
    }

    /// Writes a primitive value into `space`.
    pub fn try_set_raw(
        &self,
        key: &str,
        value: impl Into<RawValue>,
        space: Space,
    ) -> Result<(), DataStoreError> {
        self.backend(space).put(key, value.into())?;
        Ok(())
    }

    /// Writes a dynamically typed value into `space`, if it has a primitive representation.
    ///
    /// Values without one (see [`raw_from_json`](crate::raw_from_json)) are not written. The
    /// rejection is logged like any other failure.
    pub fn set_raw_json(&self, key: &str, value: &Value, space: Space) {
        if let Err(e) = self.try_set_raw_json(key, value, space) {
            warn!(key, %value, ?space, error = %e, "Failed to write raw preference");
        }
    }

    /// Writes a dynamically typed value into `space`, failing with
    /// [`DataStoreError::UnsupportedValue`] if it has no primitive representation.
    pub fn try_set_raw_json(
        &self,
        key: &str,
        value: &Value,
        space: Space,
    ) -> Result<(), DataStoreError> {
        let raw = raw_from_json(value)?;
        self.try_set_raw(key, raw, space)
    }

    /// Reads the primitive value stored under `key` in `space`.
    pub fn get_raw(&self, key: &str, space: Space) -> Option<RawValue> {
        self.try_get_raw(key, space).unwrap_or_else(|e| {
            warn!(key, ?space, error = %e, "Failed to read raw preference");
            None
        })
    }

    /// Reads the primitive value stored under `key` in `space`.
    pub fn try_get_raw(&self, key: &str, space: Space) -> Result<Option<RawValue>, DataStoreError> {
        Ok(self.backend(space).get(key)?)
    }

    // Enumeration and removal

    /// Lists the keys of the data space that start with `prefix`.
    ///
    /// This is a plain string-prefix match: `"down"` also matches keys under
    /// `"download_header_cache/"`. Use [`get_folder_keys`](Self::get_folder_keys) to stay within
    /// one folder.
    pub fn get_keys(&self, prefix: &str) -> Vec<String> {
        self.try_get_keys(prefix).unwrap_or_else(|e| {
            warn!(prefix, error = %e, "Failed to list preference keys");
            Vec::new()
        })
    }

    /// Lists the keys of the data space that start with `prefix`.
    pub fn try_get_keys(&self, prefix: &str) -> Result<Vec<String>, DataStoreError> {
        Ok(self
            .data
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    /// Lists the keys of the data space that live in `folder`, i.e. start with `"<folder>/"`.
    pub fn get_folder_keys(&self, folder: &str) -> Vec<String> {
        self.get_keys(&format!("{folder}{FOLDER_SEPARATOR}"))
    }

    /// Removes `key` from the data space. Absent keys and failures are both a no-op.
    pub fn remove_key(&self, key: &str) {
        if let Err(e) = self.try_remove_key(key) {
            warn!(key, error = %e, "Failed to remove preference");
        }
    }

    /// Removes `key` from the data space. Returns whether an entry was present.
    pub fn try_remove_key(&self, key: &str) -> Result<bool, DataStoreError> {
        Ok(self.data.remove(key)?)
    }

    /// Removes `"<folder>/<path>"` from the data space.
    pub fn remove_folder_key(&self, folder: &str, path: &str) {
        self.remove_key(&folder_name(folder, path))
    }

    /// Removes every key returned by [`get_keys`](Self::get_keys) for `prefix` and returns how
    /// many keys were found.
    ///
    /// Each removal stands alone: one failing does not stop the rest, and the count includes
    /// keys whose removal failed.
    pub fn remove_keys(&self, prefix: &str) -> usize {
        let keys = self.get_keys(prefix);
        for key in &keys {
            self.remove_key(key);
        }
        debug!(prefix, count = keys.len(), "Removed preference keys");
        keys.len()
    }

    /// Removes every entry in `space`. Failures are logged and swallowed.
    pub fn clear_space(&self, space: Space) {
        if let Err(e) = self.try_clear_space(space) {
            warn!(?space, error = %e, "Failed to clear preferences");
        }
    }

    /// Removes every entry in `space`, leaving the other space untouched.
    pub fn try_clear_space(&self, space: Space) -> Result<(), DataStoreError> {
        self.backend(space).clear()?;
        debug!(?space, "Cleared preference space");
        Ok(())
    }

    /// Returns whether the data space holds `key`. A failing backend reads as `false`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains(key).unwrap_or_else(|e| {
            warn!(key, error = %e, "Failed to look up preference");
            false
        })
    }

    /// Returns whether the data space holds `"<folder>/<path>"`.
    pub fn contains_folder_key(&self, folder: &str, path: &str) -> bool {
        self.contains_key(&folder_name(folder, path))
    }

    // JSON-backed values

    /// Stores `value` as JSON text under `key` in the data space. Failures are logged and
    /// swallowed.
    pub fn set_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set_key(key, value) {
            warn!(key, error = %e, "Failed to write preference");
        }
    }

    /// Stores `value` as JSON text under `key` in the data space.
    ///
    /// A value containing a NaN or infinite float is rejected with
    /// [`DataStoreError::UnsupportedValue`] and the existing entry is left as it was.
    pub fn try_set_key<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), DataStoreError> {
        if has_non_finite_float(value) {
            return Err(DataStoreError::UnsupportedValue {
                kind: "non-finite float",
            });
        }
        let json = serde_json::to_string(value)?;
        self.data.put(key, RawValue::String(json))?;
        Ok(())
    }

    /// Stores `value` as JSON text under `"<folder>/<path>"`.
    pub fn set_folder_key<T: Serialize + ?Sized>(&self, folder: &str, path: &str, value: &T) {
        self.set_key(&folder_name(folder, path), value)
    }

    /// Reads and decodes the JSON value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent. A stored value that does not decode as `T`, or a
    /// primitive entry that is not a string, is an error.
    pub fn try_get_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DataStoreError> {
        let Some(raw) = self.data.get(key)? else {
            return Ok(None);
        };

        let kind = raw.kind();
        let json = raw.into_string().ok_or_else(|| DataStoreError::NotAString {
            key: key.to_owned(),
            kind,
        })?;

        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Reads the JSON value stored under `key`. Absent keys and failures both read as `None`.
    pub fn get_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_key_or(key, None)
    }

    /// Reads the JSON value stored under `key`, returning `default` if the key is absent.
    ///
    /// A value that is present but fails to decode yields `None`, not `default`.
    pub fn get_key_or<T: DeserializeOwned>(&self, key: &str, default: Option<T>) -> Option<T> {
        match self.try_get_key(key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => default,
            Err(e) => {
                warn!(key, has_default = default.is_some(), error = %e, "Failed to read preference");
                None
            }
        }
    }

    /// Reads the JSON value stored under `"<folder>/<path>"`.
    pub fn get_folder_key<T: DeserializeOwned>(&self, folder: &str, path: &str) -> Option<T> {
        self.get_key(&folder_name(folder, path))
    }

    /// Reads the JSON value stored under `"<folder>/<path>"`, returning `default` if it is absent
    /// or fails to decode.
    pub fn get_folder_key_or<T: DeserializeOwned>(
        &self,
        folder: &str,
        path: &str,
        default: Option<T>,
    ) -> Option<T> {
        let key = folder_name(folder, path);
        match self.try_get_key(&key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => default,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read preference");
                default
            }
        }
    }

    // Typed keys

    /// Reads the value of a typed key. Absent keys and failures both read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: Key<T>) -> Option<T> {
        self.get_key(key.name())
    }

    /// Writes the value of a typed key. Failures are logged and swallowed.
    pub fn set<T: Serialize>(&self, key: Key<T>, value: &T) {
        self.set_key(key.name(), value)
    }

    /// Removes a typed key.
    pub fn remove<T>(&self, key: Key<T>) {
        self.remove_key(key.name())
    }
}
