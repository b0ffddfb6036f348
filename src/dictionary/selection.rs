// Dictionary selection manager
//
// Holds the ordered set of selected dictionary keys and reconciles it with the
// backend catalog. Every mutation is mirrored to the location (query parameter)
// and to local storage, and announced through the selection event emitter.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::codec::{is_representable, join_selection, split_selection};
use crate::backend::{BackendAccess, BackendError};
use crate::busy::BusyGuard;
use crate::events::SelectionEventEmitter;
use crate::location::{parameters, Location};
use crate::model::BilingualDictionary;
use crate::storage::{storage_keys, LocalStorage};
use crate::{debug, error, info};

/// Error types for catalog reloads
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Another reload is still outstanding
    #[error("Dictionary catalog is already reloading")]
    ReloadInProgress,
    /// The backend could not deliver the catalog
    #[error("Failed to reload dictionary catalog: {0}")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Default)]
struct SelectionState {
    /// Selected keys in insertion order
    selected: Vec<String>,
    /// Last catalog delivered by the backend
    catalog: Vec<BilingualDictionary>,
    /// Whether a catalog has been delivered at least once
    loaded: bool,
}

impl SelectionState {
    fn is_known(&self, key: &str) -> bool {
        self.catalog.iter().any(|d| d.matches_key(key))
    }

    /// Enable a key; unknown keys are refused only when `check_existing` is set and a catalog is loaded
    fn enable(&mut self, key: &str, check_existing: bool) -> bool {
        if !is_representable(key) {
            debug!("Refusing dictionary key {:?} containing the separator", key);
            return false;
        }
        if check_existing && self.loaded && !self.is_known(key) {
            debug!("Couldn't enable unknown dictionary {}", key);
            return false;
        }
        if !self.selected.iter().any(|k| k == key) {
            self.selected.push(key.to_string());
        }
        debug!("Enabled dictionary {} for query", key);
        true
    }

    fn selection_string(&self) -> String {
        join_selection(&self.selected)
    }
}

/// Keeps the dictionary selection consistent with catalog, location and storage
pub struct DictionarySelectionManager {
    state: Mutex<SelectionState>,
    loading: AtomicBool,
    backend: Arc<dyn BackendAccess>,
    storage: Arc<dyn LocalStorage>,
    location: Arc<dyn Location>,
    emitter: Arc<dyn SelectionEventEmitter>,
}

impl DictionarySelectionManager {
    /// Create a manager with an empty selection and no catalog
    pub fn new(
        backend: Arc<dyn BackendAccess>,
        storage: Arc<dyn LocalStorage>,
        location: Arc<dyn Location>,
        emitter: Arc<dyn SelectionEventEmitter>,
    ) -> Self {
        Self {
            state: Mutex::new(SelectionState::default()),
            loading: AtomicBool::new(false),
            backend,
            storage,
            location,
            emitter,
        }
    }

    /// Restore the selection from the location, falling back to local storage.
    ///
    /// Keys are enabled without checking the catalog, which may not be loaded
    /// yet; the next successful [`reload_catalog`](Self::reload_catalog) prunes
    /// unknown keys. Any previous selection is replaced; emits one selection
    /// change unless the selection was and stays empty.
    pub fn initialize(&self) {
        let candidate = self
            .location
            .search_param(parameters::DICTIONARIES)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.storage
                    .get(storage_keys::LAST_SELECTED_DICTIONARIES)
                    .filter(|s| !s.trim().is_empty())
            });

        let (cleared, enabled) = {
            let mut state = self.state.lock();
            let cleared = !state.selected.is_empty();
            state.selected.clear();
            if let Some(candidate) = &candidate {
                debug!("Restoring dictionary selection {}", candidate);
                for key in split_selection(candidate) {
                    state.enable(&key, false);
                }
            } else {
                debug!("No previous dictionary selection found");
            }
            (cleared, state.selected.len())
        };

        if enabled > 0 {
            info!("Restored {} selected dictionaries", enabled);
        }
        if cleared || enabled > 0 {
            self.emitter.emit_selection_changed();
        }
    }

    /// Fetch the catalog from the backend and prune selected keys it no longer contains.
    ///
    /// A reload requested while another is outstanding is rejected with
    /// [`CatalogError::ReloadInProgress`]. On failure catalog and selection are
    /// left untouched and no notification is emitted.
    pub async fn reload_catalog(&self) -> Result<Vec<BilingualDictionary>, CatalogError> {
        let Some(guard) = BusyGuard::acquire(&self.loading) else {
            debug!("Catalog reload requested while another reload is outstanding");
            return Err(CatalogError::ReloadInProgress);
        };

        debug!("Reloading dictionaries...");
        let dictionaries = match self.backend.fetch_bilingual_dictionaries().await {
            Ok(dictionaries) => dictionaries,
            Err(e) => {
                error!("Updating dictionary list failed: {}", e);
                return Err(e.into());
            }
        };

        let (pruned, selection) = {
            let mut locked = self.state.lock();
            let state = &mut *locked;
            state.catalog = dictionaries.clone();
            state.loaded = true;

            let before = state.selected.len();
            let catalog = &state.catalog;
            state.selected.retain(|key| {
                let known = catalog.iter().any(|d| d.matches_key(key));
                if !known {
                    info!("Removing unavailable dictionary {} from selection", key);
                }
                known
            });
            (state.selected.len() != before, state.selection_string())
        };

        info!("Updated dictionary list with {} dictionaries", dictionaries.len());
        if pruned {
            self.persist(&selection);
        }
        drop(guard);
        self.emitter.emit_selection_changed();
        Ok(dictionaries)
    }

    /// Toggle the selection of a dictionary key.
    ///
    /// Returns true iff the key is selected afterwards. With a loaded catalog
    /// only keys matching a dictionary's plain or dialect key can be selected;
    /// before the catalog is loaded every key is accepted. The resulting
    /// selection is always persisted and announced.
    pub fn toggle(&self, key: &str) -> bool {
        let (selected, selection) = {
            let mut state = self.state.lock();
            let position = state.selected.iter().position(|k| k == key);
            let selected = match position {
                Some(index) => {
                    state.selected.remove(index);
                    debug!("Disabled dictionary {} for query", key);
                    false
                }
                None => state.enable(key, true),
            };
            (selected, state.selection_string())
        };

        self.persist(&selection);
        self.emitter.emit_selection_changed();
        selected
    }

    /// Replace the whole selection with the keys of a selection string.
    ///
    /// With `check_existing` unknown keys are skipped once a catalog is
    /// loaded. Returns the keys that ended up selected.
    pub fn enable_from_selection_string(&self, selection: &str, check_existing: bool) -> Vec<String> {
        debug!(
            "Trying to enable dictionaries {}. Will {}check if dictionaries exist",
            selection,
            if check_existing { "" } else { "not " }
        );

        let (enabled, joined) = {
            let mut state = self.state.lock();
            state.selected.clear();
            for key in split_selection(selection) {
                state.enable(&key, check_existing);
            }
            (state.selected.clone(), state.selection_string())
        };

        self.persist(&joined);
        self.emitter.emit_selection_changed();
        enabled
    }

    /// Switch to the keys of a selection string, checked against the catalog.
    ///
    /// Unlike [`enable_from_selection_string`](Self::enable_from_selection_string)
    /// the current selection is kept, and nothing is persisted or announced, when
    /// none of the keys can be enabled. Returns the new selection otherwise.
    pub fn switch_selection(&self, selection: &str) -> Option<Vec<String>> {
        let (enabled, joined) = {
            let mut state = self.state.lock();
            let previous = std::mem::take(&mut state.selected);
            for key in split_selection(selection) {
                state.enable(&key, true);
            }
            if state.selected.is_empty() {
                debug!("None of {:?} can be selected, keeping selection", selection);
                state.selected = previous;
                return None;
            }
            (state.selected.clone(), state.selection_string())
        };

        self.persist(&joined);
        self.emitter.emit_selection_changed();
        Some(enabled)
    }

    /// Whether the key is currently selected
    pub fn is_selected(&self, key: &str) -> bool {
        self.state.lock().selected.iter().any(|k| k == key)
    }

    /// Selected keys joined by the separator, in insertion order
    pub fn current_selection_string(&self) -> String {
        self.state.lock().selection_string()
    }

    /// Selected keys in insertion order
    pub fn selected_keys(&self) -> Vec<String> {
        self.state.lock().selected.clone()
    }

    /// Catalog entries whose dialect-qualified key is selected, in catalog order
    pub fn selected_dictionaries(&self) -> Vec<BilingualDictionary> {
        let state = self.state.lock();
        state
            .catalog
            .iter()
            .filter(|d| state.selected.contains(&d.query_string_with_dialect))
            .cloned()
            .collect()
    }

    /// Last catalog delivered by the backend; empty before the first reload
    pub fn catalog(&self) -> Vec<BilingualDictionary> {
        self.state.lock().catalog.clone()
    }

    /// Whether a catalog has been loaded successfully at least once
    pub fn is_catalog_loaded(&self) -> bool {
        self.state.lock().loaded
    }

    /// Whether a catalog reload is outstanding
    pub fn is_catalog_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Build a selection string from dictionaries using their dialect-qualified keys
    pub fn build_dictionary_string(dictionaries: &[BilingualDictionary]) -> String {
        let keys: Vec<&str> = dictionaries
            .iter()
            .map(|d| d.query_string_with_dialect.as_str())
            .collect();
        join_selection(&keys)
    }

    /// Mirror the selection into the location and local storage
    fn persist(&self, selection: &str) {
        self.location
            .set_search_param(parameters::DICTIONARIES, selection);
        crate::persist_or_warn!(
            self.storage
                .set(storage_keys::LAST_SELECTED_DICTIONARIES, selection),
            "dictionary selection"
        );
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
