#![doc = include_str!("../README.md")]

mod error;
mod finite;
mod key;
mod keys;
mod raw;
mod store;

pub use datastore_state::{
    BackendError, PreferenceBackend, RawKind, RawValue, SpaceNames, StoreConfiguration,
    DEFAULT_APP_SETTINGS_NAME, PREFERENCES_NAME,
};
pub use error::DataStoreError;
pub use key::Key;
pub use keys::{
    folder_name, DOWNLOAD_EPISODE_CACHE, DOWNLOAD_HEADER_CACHE, FOLDER_SEPARATOR, HOMEPAGE_API,
    USER_PROVIDER_API, VIDEO_PLAYER_BRIGHTNESS,
};
pub use raw::raw_from_json;
pub use store::{PreferenceStore, Space};
