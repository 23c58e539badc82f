use d2j::{KeyStorage, KeyValueStore, StorageError};
use wasm_bindgen::{JsCast, JsValue};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// `window.localStorage` as a [`KeyValueStore`].
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| write_error(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .remove_item(key)
            .map_err(|e| write_error(key, e))
    }
}

pub(super) fn key_storage() -> KeyStorage<LocalStorage> {
    KeyStorage::new(LocalStorage)
}

fn write_error(key: &str, err: JsValue) -> StorageError {
    if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
        // Firefox used to report NS_ERROR_DOM_QUOTA_REACHED.
        if matches!(
            dom.name().as_str(),
            "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED"
        ) {
            return StorageError::QuotaExceeded {
                key: key.to_string(),
            };
        }
        return StorageError::WriteRejected {
            key: key.to_string(),
            reason: dom.message(),
        };
    }

    let reason = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "unknown error".to_string());
    tracing::warn!(key, %reason, "localStorage write failed");
    StorageError::WriteRejected {
        key: key.to_string(),
        reason,
    }
}
