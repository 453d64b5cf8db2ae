use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    backend::{BackendError, PreferenceBackend},
    memory::MemoryBackend,
    sqlite::SqliteConnection,
};

/// Name of the data space. Part of the persisted format; changing it orphans stored data.
pub const PREFERENCES_NAME: &str = "rebuild_preference";

/// Name of the application settings space. Part of the persisted format.
pub const DEFAULT_APP_SETTINGS_NAME: &str = "app_settings";

/// Configuration for the storage used by a preference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfiguration {
    /// Process-local storage, discarded on exit.
    Memory,

    /// SQLite storage, used on native platforms.
    Sqlite {
        /// The file path to the SQLite database. Both spaces are stored in this one file.
        file_path: PathBuf,
    },
}

/// The names of the two preference spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceNames {
    /// The application settings space, written when editing app settings.
    pub app_settings: String,
    /// The data space, used for everything else.
    pub data: String,
}

impl Default for SpaceNames {
    fn default() -> Self {
        SpaceNames {
            app_settings: DEFAULT_APP_SETTINGS_NAME.to_string(),
            data: PREFERENCES_NAME.to_string(),
        }
    }
}

/// The pair of backends opened from a [`StoreConfiguration`].
#[derive(Clone)]
pub struct Backends {
    /// Backend for the application settings space.
    pub app_settings: Arc<dyn PreferenceBackend>,
    /// Backend for the data space.
    pub data: Arc<dyn PreferenceBackend>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("app_settings", &self.app_settings.name())
            .field("data", &self.data.name())
            .finish()
    }
}

impl StoreConfiguration {
    /// Opens both spaces described by `names`.
    ///
    /// The spaces must have distinct names, otherwise writes to one would be visible from the
    /// other.
    pub fn open(&self, names: &SpaceNames) -> Result<Backends, BackendError> {
        if names.app_settings == names.data {
            return Err(BackendError::Internal(format!(
                "Preference spaces must have distinct names, both are '{}'",
                names.data
            )));
        }

        match self {
            StoreConfiguration::Memory => Ok(Backends {
                app_settings: Arc::new(MemoryBackend::new(names.app_settings.clone())),
                data: Arc::new(MemoryBackend::new(names.data.clone())),
            }),
            StoreConfiguration::Sqlite { file_path } => {
                let connection = SqliteConnection::open(file_path)?;
                Ok(Backends {
                    app_settings: Arc::new(connection.space(names.app_settings.clone())),
                    data: Arc::new(connection.space(names.data.clone())),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_space_names() {
        let names = SpaceNames::default();
        assert_eq!(names.app_settings, "app_settings");
        assert_eq!(names.data, "rebuild_preference");
    }

    #[test]
    fn test_open_memory() {
        let backends = StoreConfiguration::Memory
            .open(&SpaceNames::default())
            .unwrap();
        assert_eq!(backends.app_settings.name(), DEFAULT_APP_SETTINGS_NAME);
        assert_eq!(backends.data.name(), PREFERENCES_NAME);
    }

    #[test]
    fn test_open_rejects_shared_name() {
        let names = SpaceNames {
            app_settings: "same".to_string(),
            data: "same".to_string(),
        };
        let err = StoreConfiguration::Memory.open(&names).unwrap_err();
        assert!(matches!(err, BackendError::Internal(_)));
    }

    #[test]
    fn test_configuration_deserializes() {
        let config: StoreConfiguration =
            serde_json::from_str(r#"{"type":"sqlite","file_path":"/tmp/prefs.sqlite"}"#).unwrap();
        assert_eq!(
            config,
            StoreConfiguration::Sqlite {
                file_path: PathBuf::from("/tmp/prefs.sqlite")
            }
        );

        let names: SpaceNames = serde_json::from_str(r#"{"data":"custom"}"#).unwrap();
        assert_eq!(names.data, "custom");
        assert_eq!(names.app_settings, DEFAULT_APP_SETTINGS_NAME);
    }
}
