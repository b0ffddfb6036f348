//! Persistent local key-value storage.
//!
//! This module provides the client's equivalent of browser local storage:
//! a small string-to-string store that survives restarts and is used to
//! remember the last dictionary selection and the session token.
//!
//! ## Usage
//!
//! ```ignore
//! use metadict_client::storage::{FileStorage, LocalStorage, storage_keys};
//!
//! let storage = FileStorage::with_default_path()?;
//! storage.set(storage_keys::LAST_SELECTED_DICTIONARIES, "de-en,de-no")?;
//! ```

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Predefined storage keys
pub mod storage_keys {
    pub const LAST_SELECTED_DICTIONARIES: &str = "lastSelectedDictionaries";
    /// Token of the current backend session
    pub const SESSION_TOKEN: &str = "sessionToken";
}

/// Error types for storage operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// Failed to read or parse the storage file
    #[error("Failed to load storage: {0}")]
    Load(String),
    /// Failed to write the storage file
    #[error("Failed to persist storage: {0}")]
    Persist(String),
}

/// Key-value storage backend.
///
/// Receivers are shared references so a single storage can be used by
/// several components; implementations synchronize internally.
pub trait LocalStorage: Send + Sync {
    /// Get the value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
