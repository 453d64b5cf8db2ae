//! End-to-end behavior of `PreferenceStore` over every backend.

use std::collections::{BTreeSet, HashMap};

use datastore::{
    folder_name, PreferenceStore, RawValue, Space, SpaceNames, StoreConfiguration,
    DOWNLOAD_EPISODE_CACHE, DOWNLOAD_HEADER_CACHE,
};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

/// Every backend under test. The `TempDir` keeps the SQLite file alive for the test's duration.
fn stores() -> Vec<(PreferenceStore, Option<TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let sqlite = StoreConfiguration::Sqlite {
        file_path: dir.path().join("prefs.sqlite"),
    };

    vec![
        (PreferenceStore::in_memory(), None),
        (
            PreferenceStore::open(&sqlite, &SpaceNames::default()).unwrap(),
            Some(dir),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DownloadHeader {
    id: i32,
    name: String,
    poster: Option<String>,
    episodes: Vec<u32>,
    extra: HashMap<String, String>,
}

#[test]
fn test_folder_scenario() {
    for (store, _dir) in stores() {
        store.set_folder_key("prefs", "theme", "dark");

        assert_eq!(
            store.get_folder_key::<String>("prefs", "theme"),
            Some("dark".to_string())
        );
        assert_eq!(
            store.get_key::<String>(&folder_name("prefs", "theme")),
            Some("dark".to_string())
        );
        assert!(store.contains_folder_key("prefs", "theme"));
    }
}

#[test]
fn test_missing_key_returns_default() {
    for (store, _dir) in stores() {
        assert_eq!(store.get_key_or("missing_key", Some(42)), Some(42));
        assert_eq!(store.get_key::<i32>("missing_key"), None);
        assert_eq!(
            store.get_folder_key_or("prefs", "missing_key", Some(42)),
            Some(42)
        );
    }
}

#[test]
fn test_raw_flag_scenario() {
    for (store, _dir) in stores() {
        store.set_raw("flag", true, Space::Data);
        assert!(store.contains_key("flag"));

        store.remove_key("flag");
        assert!(!store.contains_key("flag"));

        // Removing again is a no-op.
        store.remove_key("flag");
        assert!(!store.try_remove_key("flag").unwrap());
    }
}

#[test]
fn test_raw_values_read_back_natively() {
    for (store, _dir) in stores() {
        let values = [
            ("bool", RawValue::Bool(false)),
            ("int_min", RawValue::Int(i32::MIN)),
            ("int_max", RawValue::Int(i32::MAX)),
            ("string", RawValue::String("hello".to_string())),
            ("empty_string", RawValue::String(String::new())),
            ("float", RawValue::Float(1.5)),
            ("float_inf", RawValue::Float(f32::INFINITY)),
            ("float_neg_inf", RawValue::Float(f32::NEG_INFINITY)),
            ("float_max", RawValue::Float(f32::MAX)),
            ("float_min_positive", RawValue::Float(f32::MIN_POSITIVE)),
            ("long", RawValue::Long(1 << 40)),
            ("long_min", RawValue::Long(i64::MIN)),
            ("long_max", RawValue::Long(i64::MAX)),
            (
                "set",
                RawValue::StringSet(BTreeSet::from(["x".to_string(), "y".to_string()])),
            ),
            ("empty_set", RawValue::StringSet(BTreeSet::new())),
        ];

        for (key, value) in values {
            store.set_raw(key, value.clone(), Space::Data);
            assert_eq!(store.get_raw(key, Space::Data), Some(value), "{key}");
        }

        store.set_raw("float_nan", f32::NAN, Space::Data);
        assert!(matches!(
            store.get_raw("float_nan", Space::Data),
            Some(RawValue::Float(f)) if f.is_nan()
        ));
    }
}

#[test]
fn test_non_finite_json_value_keeps_previous_entry() {
    for (store, _dir) in stores() {
        store.set_key("brightness", &0.5_f32);
        assert!(store.try_set_key("brightness", &f32::NAN).is_err());
        assert_eq!(store.get_key::<f32>("brightness"), Some(0.5));
    }
}

#[test]
fn test_app_settings_space_is_separate() {
    for (store, _dir) in stores() {
        store.set_raw(
            "player_speed",
            0.5_f32,
            Space::from_app_settings_flag(true),
        );

        assert!(!store.contains_key("player_speed"));
        assert_eq!(
            store.get_raw("player_speed", Space::AppSettings),
            Some(RawValue::Float(0.5))
        );
    }
}

#[test]
fn test_structured_round_trip() {
    for (store, _dir) in stores() {
        let header = DownloadHeader {
            id: 7,
            name: "Example".to_string(),
            poster: None,
            episodes: vec![1, 2, 3],
            extra: HashMap::from([("quality".to_string(), "1080p".to_string())]),
        };

        store.set_folder_key(DOWNLOAD_HEADER_CACHE, "7", &header);

        assert_eq!(
            store.get_folder_key::<DownloadHeader>(DOWNLOAD_HEADER_CACHE, "7"),
            Some(header)
        );
    }
}

#[test]
fn test_remove_keys_clears_folder() {
    for (store, _dir) in stores() {
        for id in 1..=3 {
            store.set_folder_key(DOWNLOAD_HEADER_CACHE, &id.to_string(), &id);
        }
        store.set_folder_key(DOWNLOAD_EPISODE_CACHE, "1", &1);

        let keys = store.get_keys(DOWNLOAD_HEADER_CACHE);
        assert_eq!(keys.len(), 3);

        assert_eq!(store.remove_keys(DOWNLOAD_HEADER_CACHE), keys.len());
        assert!(store.get_keys(DOWNLOAD_HEADER_CACHE).is_empty());
        assert!(store.contains_folder_key(DOWNLOAD_EPISODE_CACHE, "1"));
        assert_eq!(store.remove_keys(DOWNLOAD_HEADER_CACHE), 0);
    }
}

#[test]
fn test_prefix_matching_crosses_folder_boundaries() {
    for (store, _dir) in stores() {
        store.set_folder_key("cache", "a", &1);
        store.set_folder_key("cache_old", "b", &2);

        // Plain prefix matching also picks up the sibling folder.
        assert_eq!(
            store.get_keys("cache"),
            vec!["cache/a".to_string(), "cache_old/b".to_string()]
        );
        assert_eq!(store.get_folder_keys("cache"), vec!["cache/a".to_string()]);
    }
}

#[test]
fn test_sqlite_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let configuration = StoreConfiguration::Sqlite {
        file_path: dir.path().join("prefs.sqlite"),
    };

    {
        let store = PreferenceStore::open(&configuration, &SpaceNames::default()).unwrap();
        store.set_key("home_api_used", "provider");
        store.set_raw("volume", 3_i32, Space::AppSettings);
    }

    let store = PreferenceStore::open(&configuration, &SpaceNames::default()).unwrap();
    assert_eq!(
        store.get_key::<String>("home_api_used"),
        Some("provider".to_string())
    );
    assert_eq!(
        store.get_raw("volume", Space::AppSettings),
        Some(RawValue::Int(3))
    );
}
