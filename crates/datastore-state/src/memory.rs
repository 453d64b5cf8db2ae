use std::{collections::HashMap, sync::RwLock};

use crate::{
    backend::{BackendError, PreferenceBackend},
    value::RawValue,
};

/// A preference space held in process memory. Contents are lost on drop.
pub struct MemoryBackend {
    name: String,
    entries: RwLock<HashMap<String, RawValue>>,
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("name", &self.name)
            .finish()
    }
}

impl MemoryBackend {
    /// Creates an empty space with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        MemoryBackend {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl PreferenceBackend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Result<Option<RawValue>, BackendError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BackendError::Poisoned("memory backend"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: RawValue) -> Result<(), BackendError> {
        self.entries
            .write()
            .map_err(|_| BackendError::Poisoned("memory backend"))?
            .insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, BackendError> {
        let removed = self
            .entries
            .write()
            .map_err(|_| BackendError::Poisoned("memory backend"))?
            .remove(key);
        Ok(removed.is_some())
    }

    fn contains(&self, key: &str) -> Result<bool, BackendError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BackendError::Poisoned("memory backend"))?;
        Ok(entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BackendError::Poisoned("memory backend"))?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<(), BackendError> {
        self.entries
            .write()
            .map_err(|_| BackendError::Poisoned("memory backend"))?
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_overwrites_any_kind() {
        let backend = MemoryBackend::new("test");
        backend.put("k", RawValue::Int(1)).unwrap();
        backend.put("k", RawValue::String("one".to_string())).unwrap();

        assert_eq!(
            backend.get("k").unwrap(),
            Some(RawValue::String("one".to_string()))
        );
        assert_eq!(backend.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_remove_reports_presence() {
        let backend = MemoryBackend::new("test");
        backend.put("k", RawValue::Bool(true)).unwrap();

        assert!(backend.remove("k").unwrap());
        assert!(!backend.remove("k").unwrap());
        assert!(!backend.contains("k").unwrap());
    }

    #[test]
    fn test_keys_are_sorted_and_clear_empties() {
        let backend = MemoryBackend::new("test");
        for key in ["b", "c", "a"] {
            backend.put(key, RawValue::Long(0)).unwrap();
        }

        assert_eq!(backend.keys().unwrap(), vec!["a", "b", "c"]);

        backend.clear().unwrap();
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn test_poisoned_lock_is_an_error() {
        let backend = std::sync::Arc::new(MemoryBackend::new("test"));
        let poisoner = backend.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            backend.get("k"),
            Err(BackendError::Poisoned("memory backend"))
        ));
        assert!(matches!(
            backend.put("k", RawValue::Bool(true)),
            Err(BackendError::Poisoned(_))
        ));
    }
}
