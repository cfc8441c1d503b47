//! `localStorage` binding for [`KeyValueStore`].
//!
//! The page's `localStorage` is small (a few megabytes per origin) and every
//! record carries its whole image as a data URL, so writes can fail with
//! [`Error::QuotaExceeded`]. That surfaces to the upload or tag operation
//! that caused it; nothing already stored is touched.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage, Window};

use crate::error::{Error, Result};
use crate::store::{KeyValueStorage, KeyValueStore};

const QUOTA_EXCEEDED: &str = "QuotaExceededError";

/// The window's `localStorage`.
pub struct LocalStorage {
    storage: Storage,
}

/// Tagged images persisted in `localStorage`.
pub type LocalStorageStore = KeyValueStore<LocalStorage>;

impl LocalStorageStore {
    /// Open the window's storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] when `localStorage` is missing
    /// or access to it is denied.
    pub fn open(window: &Window) -> Result<Self> {
        match window.local_storage() {
            Ok(Some(storage)) => Ok(KeyValueStore::new(LocalStorage { storage })),
            Ok(None) => Err(Error::StorageUnavailable("localStorage is not supported".to_owned())),
            Err(e) => Err(Error::StorageUnavailable(format!("{e:?}"))),
        }
    }
}

fn write_error(key: &str, e: &JsValue) -> Error {
    match e.dyn_ref::<DomException>() {
        Some(ex) if ex.name() == QUOTA_EXCEEDED => Error::QuotaExceeded(key.to_owned()),
        _ => Error::Storage(format!("write {key}: {e:?}")),
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| Error::Storage(format!("read {key}: {e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(|e| write_error(key, &e))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| Error::Storage(format!("remove {key}: {e:?}")))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let len = self.storage.length().map_err(|e| Error::Storage(format!("{e:?}")))?;
        let mut keys = Vec::new();
        for i in 0..len {
            if let Some(key) = self.storage.key(i).map_err(|e| Error::Storage(format!("{e:?}")))? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
