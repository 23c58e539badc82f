//! The `databaseKey` accessor.
//!
//! [`KeyStorage`] reads and writes exactly one string under [`DATABASE_KEY`].
//! The backing store is injected through [`KeyValueStore`]: the web crate
//! plugs in `window.localStorage`, tests use [`MemoryStore`].

use std::collections::HashMap;

use crate::error::StorageError;

/// The only key this app ever persists.
pub const DATABASE_KEY: &str = "databaseKey";

/// A persistent string-to-string store.
pub trait KeyValueStore {
    /// `None` when the key was never set (or the store cannot be read).
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrites unconditionally.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Get/set access to the persisted database key.
#[derive(Debug, Clone, Default)]
pub struct KeyStorage<S> {
    store: S,
}

impl<S: KeyValueStore> KeyStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored key, or `None` if it was never set.
    pub fn get_stored_key(&self) -> Option<String> {
        let value = self.store.get(DATABASE_KEY);
        tracing::debug!(present = value.is_some(), "read {DATABASE_KEY}");
        value
    }

    /// Stores `value`, replacing whatever was there.
    pub fn set_stored_key(&mut self, value: &str) -> Result<(), StorageError> {
        self.store.set(DATABASE_KEY, value)?;
        tracing::debug!(len = value.len(), "stored {DATABASE_KEY}");
        Ok(())
    }

    pub fn clear_stored_key(&mut self) -> Result<(), StorageError> {
        self.store.remove(DATABASE_KEY)?;
        tracing::debug!("cleared {DATABASE_KEY}");
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hands the backing store back, e.g. to reopen it with a fresh accessor.
    pub fn into_store(self) -> S {
        self.store
    }
}
