// ============================================================================
// STORAGE - Almacenamiento clave-valor con prefijo de aplicación
// ============================================================================
// KeyValueStore es la capacidad (localStorage en el navegador, memoria en
// tests); NamespacedStorage antepone el prefijo de la app a cada clave.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;

/// Almacén de strings con mutabilidad interior (como `window.localStorage`).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Almacén en memoria
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage
            .remove_item(key)
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}

/// Vista del almacén con todas las claves bajo `prefix`.
#[derive(Clone)]
pub struct NamespacedStorage {
    inner: Rc<dyn KeyValueStore>,
    prefix: String,
}

impl NamespacedStorage {
    pub fn new(inner: Rc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(&self.full_key(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(&self.full_key(key), value)
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(&self.full_key(key))
    }

    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }

    /// `None` si la clave no existe o el JSON guardado ya no encaja con `T`.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.get(key)?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("⚠️ Valor corrupto en storage '{}': {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn namespaced(prefix: &str) -> (MemoryStore, NamespacedStorage) {
        let raw = MemoryStore::new();
        let storage = NamespacedStorage::new(Rc::new(raw.clone()), prefix);
        (raw, storage)
    }

    #[test]
    fn keys_are_written_under_prefix() {
        let (raw, storage) = namespaced("app_");
        storage.set("authToken", "abc").unwrap();

        assert_eq!(raw.keys(), vec!["app_authToken".to_string()]);
        assert_eq!(raw.get_item("authToken"), None);
        assert_eq!(storage.get("authToken").as_deref(), Some("abc"));
    }

    #[test]
    fn two_prefixes_do_not_collide() {
        let raw = MemoryStore::new();
        let shared: Rc<dyn KeyValueStore> = Rc::new(raw.clone());
        let ours = NamespacedStorage::new(shared.clone(), "ours_");
        let theirs = NamespacedStorage::new(shared, "theirs_");

        ours.set("authToken", "1").unwrap();
        theirs.set("authToken", "2").unwrap();
        ours.remove("authToken").unwrap();

        assert_eq!(ours.get("authToken"), None);
        assert_eq!(theirs.get("authToken").as_deref(), Some("2"));
    }

    #[test]
    fn json_helpers_round_trip_and_tolerate_garbage() {
        let (_raw, storage) = namespaced("app_");
        let sample = Sample { name: "Maria".into(), count: 3 };
        storage.save_json("sample", &sample).unwrap();
        assert_eq!(storage.load_json::<Sample>("sample"), Some(sample));

        storage.set("sample", "{not json").unwrap();
        assert_eq!(storage.load_json::<Sample>("sample"), None);
        assert_eq!(storage.load_json::<Sample>("missing"), None);
    }
}
