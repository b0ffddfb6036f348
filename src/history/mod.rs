//! Paged access to the backend's query history.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::backend::{BackendAccess, BackendError};
use crate::busy::BusyGuard;
use crate::model::{Link, QueryLogEntry};
use crate::{debug, error};

/// Error types for history loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    /// A page is already being loaded
    #[error("History is already loading")]
    AlreadyLoading,
    /// The backend failed to deliver the page
    #[error("Failed to load history: {0}")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Default)]
struct PagerState {
    entries: Vec<QueryLogEntry>,
    next: Option<Link>,
    /// At least one page was loaded
    started: bool,
}

/// Loads query history page by page, following the backend's `next` links
pub struct HistoryPager {
    backend: Arc<dyn BackendAccess>,
    state: Mutex<PagerState>,
    loading: AtomicBool,
}

impl HistoryPager {
    pub fn new(backend: Arc<dyn BackendAccess>) -> Self {
        Self {
            backend,
            state: Mutex::new(PagerState::default()),
            loading: AtomicBool::new(false),
        }
    }

    /// Load the next page and append it; the first call loads the first page.
    ///
    /// Returns the number of entries added. Once the backend stops sending a
    /// `next` link further calls return `Ok(0)` without a request.
    pub async fn load_more(&self) -> Result<usize, HistoryError> {
        let Some(_guard) = BusyGuard::acquire(&self.loading) else {
            return Err(HistoryError::AlreadyLoading);
        };
        self.load_page().await
    }

    async fn load_page(&self) -> Result<usize, HistoryError> {
        let link = {
            let state = self.state.lock();
            if state.started && state.next.is_none() {
                debug!("No more history pages");
                return Ok(0);
            }
            state.next.clone()
        };

        let (entries, links) = match self.backend.load_history(link.as_ref()).await {
            Ok(page) => page,
            Err(e) => {
                error!("Loading history failed: {}", e);
                return Err(e.into());
            }
        };

        let added = entries.len();
        let mut state = self.state.lock();
        state.entries.extend(entries);
        state.next = links.next;
        state.started = true;
        debug!(
            "Loaded {} history entries, more available: {}",
            added,
            state.next.is_some()
        );
        Ok(added)
    }

    /// Entries loaded so far, oldest page first
    pub fn entries(&self) -> Vec<QueryLogEntry> {
        self.state.lock().entries.clone()
    }

    /// Whether a page has been loaded and the history turned out to be empty
    pub fn is_empty(&self) -> bool {
        let state = self.state.lock();
        state.started && state.entries.is_empty() && state.next.is_none()
    }

    /// Whether another page can be loaded
    pub fn has_more(&self) -> bool {
        let state = self.state.lock();
        !state.started || state.next.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
