//! Type-safe keys for JSON-backed preferences.

use std::marker::PhantomData;

/// Declare a type-safe preference key.
///
/// Associates a storage name with a value type at compile time.
///
/// # Example
/// ```rust
/// use datastore::preference_key;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Provider {
///     name: String,
///     url: String,
/// }
///
/// preference_key!(pub const PROVIDERS: Vec<Provider> = "user_custom_sites");
/// ```
#[macro_export]
macro_rules! preference_key {
    ($vis:vis const $name:ident: $ty:ty = $key:literal) => {
        $vis const $name: $crate::Key<$ty> = $crate::Key::new($key);
    };
}

/// Type-safe key for JSON-backed preferences.
///
/// Use the [`preference_key!`](crate::preference_key) macro to declare keys, then read and write
/// them with [`PreferenceStore::get`](crate::PreferenceStore::get) and
/// [`PreferenceStore::set`](crate::PreferenceStore::set).
pub struct Key<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls so `T` needs none of these traits.
impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> std::fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

impl<T> Key<T> {
    /// Create a new type-safe key with the given storage name.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Get the string key name used for storage.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    #[allow(dead_code)]
    struct NotCopy;

    preference_key!(const TEST_KEY: NotCopy = "test_key");

    #[test]
    fn test_key_is_copy_for_any_type() {
        let a = TEST_KEY;
        let b = a;
        assert_eq!(a.name(), "test_key");
        assert_eq!(b.name(), "test_key");
    }
}
