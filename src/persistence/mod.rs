//! Flat key/value client storage
//!
//! Browser builds use LocalStorage; native builds and tests use an in-memory
//! map. Values are strings; JSON helpers sit on top.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Selected player color name (plain string)
pub const KEY_CHARACTER: &str = "selectedCharacter";
/// `Settings` as JSON
pub const KEY_SETTINGS: &str = "desert_flight_settings";
/// `BestScore` as JSON
pub const KEY_BEST: &str = "desert_flight_best";
/// Opaque bearer credential issued by the auth service
pub const KEY_AUTH_TOKEN: &str = "authToken";
/// Display name of the signed-in player
pub const KEY_USERNAME: &str = "username";

/// String key/value store. Writes are best-effort.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Read and decode a JSON value; missing or corrupt entries yield `None`
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt `{}` entry: {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => storage.set(key, &json),
        Err(e) => log::warn!("Failed to encode `{}`: {}", key, e),
    }
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable - nothing will persist");
        }
        Self { inner }
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.inner
            && storage.set_item(key, value).is_err()
        {
            log::warn!("Failed to write `{}` to LocalStorage", key);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.inner {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        a: u32,
    }

    #[test]
    fn test_memory_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), None);
        storage.set("k", "v");
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.remove("k");
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn test_corrupt_json_is_ignored() {
        let storage = MemoryStorage::new();
        storage.set(KEY_BEST, "{ broken");
        assert_eq!(load_json::<Sample>(&storage, KEY_BEST), None);

        save_json(&storage, KEY_BEST, &Sample { a: 3 });
        assert_eq!(load_json::<Sample>(&storage, KEY_BEST), Some(Sample { a: 3 }));
    }
}
