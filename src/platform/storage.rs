//! Key-value storage
//!
//! The game persists two things: the high score and audio settings. Both go
//! through `KeyValueStore` so the browser's LocalStorage and an in-memory map
//! are interchangeable.

use std::collections::HashMap;

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No storage backend (no window, private mode, disabled by policy)
    #[error("storage unavailable")]
    Unavailable,
    /// The backend refused the write (quota, security error)
    #[error("storage rejected write to {key:?}: {reason}")]
    Rejected { key: String, reason: String },
    /// Value could not be encoded
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value store
pub trait KeyValueStore {
    /// Read a value; `None` when missing or unreadable
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - nothing will persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected {
                key: key.to_owned(),
                reason: format!("{:?}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("hiscore"), None);
        store.set_item("hiscore", "42").unwrap();
        assert_eq!(store.get_item("hiscore").as_deref(), Some("42"));
        store.set_item("hiscore", "43").unwrap();
        assert_eq!(store.get_item("hiscore").as_deref(), Some("43"));
    }

    #[test]
    fn test_error_messages() {
        let err = StorageError::Rejected {
            key: "hiscore".into(),
            reason: "QuotaExceededError".into(),
        };
        assert_eq!(
            err.to_string(),
            "storage rejected write to \"hiscore\": QuotaExceededError"
        );
        assert_eq!(StorageError::Unavailable.to_string(), "storage unavailable");
    }
}
