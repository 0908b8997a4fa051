// ============================================================================
// CREDENTIAL STORE - token + userId persistidos
// ============================================================================
// Lo escribe el login, lo borra el logout y lo lee el ApiClient en cada call.
// ============================================================================

use crate::error::StorageError;
use crate::models::Credentials;
use crate::utils::{NamespacedStorage, STORAGE_KEY_AUTH_TOKEN, STORAGE_KEY_USER_ID};

#[derive(Clone)]
pub struct CredentialStore {
    storage: NamespacedStorage,
}

impl CredentialStore {
    pub fn new(storage: NamespacedStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &NamespacedStorage {
        &self.storage
    }

    /// `{"", None}` si no hay nada guardado; `userId` ilegible cuenta como ausente
    pub fn read(&self) -> Credentials {
        let token = self.storage.get(STORAGE_KEY_AUTH_TOKEN).unwrap_or_default();
        let user_id = self
            .storage
            .get(STORAGE_KEY_USER_ID)
            .and_then(|text| text.trim().parse::<i64>().ok());
        Credentials { token, user_id }
    }

    pub fn write(&self, credentials: &Credentials) -> Result<(), StorageError> {
        self.storage.set(STORAGE_KEY_AUTH_TOKEN, &credentials.token)?;
        match credentials.user_id {
            Some(id) => self.storage.set(STORAGE_KEY_USER_ID, &id.to_string()),
            None => self.storage.remove(STORAGE_KEY_USER_ID),
        }
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(STORAGE_KEY_AUTH_TOKEN)?;
        self.storage.remove(STORAGE_KEY_USER_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_storage;

    #[test]
    fn empty_store_reads_default() {
        let (_raw, storage) = memory_storage();
        assert_eq!(CredentialStore::new(storage).read(), Credentials::new("", None));
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_raw, storage) = memory_storage();
        let store = CredentialStore::new(storage);
        for (token, user_id) in [("abc", Some(42)), ("", None), ("x.y.z", Some(-7)), ("t", Some(i64::MAX))] {
            let credentials = Credentials::new(token, user_id);
            store.write(&credentials).unwrap();
            assert_eq!(store.read(), credentials);
        }
    }

    #[test]
    fn unparsable_user_id_reads_as_none() {
        let (_raw, storage) = memory_storage();
        storage.set(STORAGE_KEY_USER_ID, "undefined").unwrap();
        storage.set(STORAGE_KEY_AUTH_TOKEN, "tok").unwrap();
        assert_eq!(CredentialStore::new(storage).read(), Credentials::new("tok", None));
    }

    #[test]
    fn clear_removes_both_keys() {
        let (raw, storage) = memory_storage();
        let store = CredentialStore::new(storage);
        store.write(&Credentials::new("abc", Some(1))).unwrap();
        store.clear().unwrap();
        assert!(raw.is_empty());
        assert_eq!(store.read(), Credentials::default());
    }
}
