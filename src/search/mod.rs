//! Bilingual queries against the current dictionary selection.
//!
//! [`SearchService`] ties the selection manager to the backend: it checks
//! that a query can be run, records the request in the location and hands
//! it to the backend.

use std::sync::Arc;

use crate::backend::{BackendAccess, BackendError};
use crate::dictionary::DictionarySelectionManager;
use crate::location::{parameters, Location};
use crate::model::QueryResponse;
use crate::{debug, info, warn};

/// Error types for search operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// The request was empty after trimming
    #[error("Query request is empty")]
    EmptyRequest,
    /// No dictionary is selected, so there is nothing to query
    #[error("No dictionary selected")]
    NoDictionarySelected,
    /// The backend failed to answer the query
    #[error("Query failed: {0}")]
    Backend(#[from] BackendError),
}

/// Runs bilingual queries for the dictionaries selected in a [`DictionarySelectionManager`]
pub struct SearchService {
    selection: Arc<DictionarySelectionManager>,
    backend: Arc<dyn BackendAccess>,
    location: Arc<dyn Location>,
}

impl SearchService {
    pub fn new(
        selection: Arc<DictionarySelectionManager>,
        backend: Arc<dyn BackendAccess>,
        location: Arc<dyn Location>,
    ) -> Self {
        Self {
            selection,
            backend,
            location,
        }
    }

    /// Query the currently selected dictionaries for `request`.
    ///
    /// The trimmed request is stored under the `queryString` location
    /// parameter before the backend is asked, so a failed query can be retried
    /// from the location.
    pub async fn run_bilingual_query(&self, request: &str) -> Result<QueryResponse, SearchError> {
        let request = request.trim();
        if request.is_empty() {
            return Err(SearchError::EmptyRequest);
        }

        let dictionaries = self.selection.current_selection_string();
        if dictionaries.is_empty() {
            warn!("Refusing to query '{}' without selected dictionaries", request);
            return Err(SearchError::NoDictionarySelected);
        }

        self.location.set_search_param(parameters::QUERY_STRING, request);

        debug!("Querying '{}' in {}", request, dictionaries);
        let response = self
            .backend
            .execute_bilingual_query(&dictionaries, request)
            .await?;
        info!(
            "Query '{}' returned {} entries",
            request,
            response.entry_count()
        );
        Ok(response)
    }

    /// Switch the selection to `dictionaries` and query `request` in them.
    ///
    /// Used when following a word from a previous result or history entry.
    /// Keys not present in a loaded catalog are skipped. The selection is left
    /// alone when the request is empty or none of the keys can be selected.
    pub async fn run_click_query(
        &self,
        dictionaries: &str,
        request: &str,
    ) -> Result<QueryResponse, SearchError> {
        if request.trim().is_empty() {
            return Err(SearchError::EmptyRequest);
        }
        if self.selection.switch_selection(dictionaries).is_none() {
            warn!("Click query for '{}' names no usable dictionary", request.trim());
            return Err(SearchError::NoDictionarySelected);
        }
        self.run_bilingual_query(request).await
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
