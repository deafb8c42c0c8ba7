//! Browser persistence

use std::rc::Rc;

use mandanda::storage::{MemoryStorage, Storage, StorageError};

/// `window.localStorage`, or an in-memory stand-in when the page has none
/// (private browsing, sandboxed frames).
#[derive(Debug, Clone)]
pub(crate) enum PageStorage {
    /// Browser local storage
    Local(web_sys::Storage),

    /// Lost on reload
    Memory(Rc<MemoryStorage>),
}

impl PageStorage {
    /// Local storage when available.
    pub(crate) fn detect() -> Self {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .map_or_else(|| Self::Memory(Rc::default()), Self::Local)
    }
}

impl Storage for PageStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Local(storage) => storage
                .get_item(key)
                .map_err(|error| StorageError::Backend(format!("{error:?}"))),
            Self::Memory(storage) => storage.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(storage) => storage
                .set_item(key, value)
                .map_err(|error| StorageError::Backend(format!("{error:?}"))),
            Self::Memory(storage) => storage.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(storage) => storage
                .remove_item(key)
                .map_err(|error| StorageError::Backend(format!("{error:?}"))),
            Self::Memory(storage) => storage.remove(key),
        }
    }
}
