// Metadict client library: dictionary selection state, backend access and persistence
// used by the `metadict` command line front end.

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod backend;
mod busy;
pub mod config;
pub mod dictionary;
pub mod events;
pub mod history;
pub mod location;
pub mod model;
pub mod search;
pub mod session;
pub mod storage;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

pub use backend::{BackendAccess, BackendError, HttpBackend};
pub use config::{ClientConfig, ConfigError};
pub use dictionary::{CatalogError, DictionarySelectionManager};
pub use events::{AppEvent, BroadcastEmitter, SelectionEventEmitter};
pub use location::{Location, MemoryLocation};
pub use model::{BilingualDictionary, Language};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};

/// Helper macro for fire-and-forget writes: logs a warning instead of failing the caller
#[macro_export]
macro_rules! persist_or_warn {
    ($result:expr, $what:expr) => {
        if let Err(e) = $result {
            $crate::warn!("Failed to persist {}: {}", $what, e);
        }
    };
}
