// File-backed key-value storage
// Keeps all values in one JSON object and rewrites it atomically on every change

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{LocalStorage, StorageError};

pub const APP_DIR_NAME: &str = "metadict";
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Key-value storage persisted to a JSON file
#[derive(Debug)]
pub struct FileStorage {
    /// Values indexed by key
    values: Mutex<BTreeMap<String, String>>,
    /// Path to persistence file
    path: PathBuf,
}

impl FileStorage {
    /// Open the storage at the given path, loading existing values
    ///
    /// A missing file is treated as an empty storage.
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        let values = load_values(&path)?;
        crate::debug!("Opened storage {:?} with {} values", path, values.len());
        Ok(Self {
            values: Mutex::new(values),
            path,
        })
    }

    /// Open the storage in the user's data directory
    pub fn with_default_path() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            StorageError::Load("Could not determine data directory".to_string())
        })?;
        Self::open(data_dir.join(APP_DIR_NAME).join(STORAGE_FILE_NAME))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist values using atomic write (temp file + rename)
    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        crate::trace!("Persisting {} storage values to {:?}", values.len(), self.path);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Persist(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(values)
            .map_err(|e| StorageError::Persist(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path).map_err(|e| {
                StorageError::Persist(format!("Failed to create temp file: {}", e))
            })?;
            file.write_all(content.as_bytes())
                .map_err(|e| StorageError::Persist(format!("Failed to write: {}", e)))?;
            file.sync_all()
                .map_err(|e| StorageError::Persist(format!("Failed to sync: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::Persist(format!("Failed to rename: {}", e))
        })?;

        Ok(())
    }
}

fn load_values(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(path).map_err(|e| StorageError::Load(e.to_string()))?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content).map_err(|e| StorageError::Load(e.to_string()))
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock();
        let previous = values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save(&values) {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock();
        let Some(previous) = values.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.save(&values) {
            values.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
