// Tests for SearchService
// Test cases:
// - Empty requests and empty selections are refused without calling the backend
// - Queries use the current selection string and record the request in the location
// - Backend failures surface as SearchError::Backend
// - Click queries replace the selection before querying
// - Click queries that cannot run keep the previous selection

use super::*;
use crate::backend::tests::{dictionary, MockBackend};
use crate::events::tests::MockEventEmitter;
use crate::location::MemoryLocation;
use crate::storage::MemoryStorage;

fn service(
    backend: Arc<MockBackend>,
) -> (
    SearchService,
    Arc<DictionarySelectionManager>,
    Arc<MemoryLocation>,
) {
    let location = Arc::new(MemoryLocation::new());
    let selection = Arc::new(DictionarySelectionManager::new(
        backend.clone(),
        Arc::new(MemoryStorage::new()),
        location.clone(),
        Arc::new(MockEventEmitter::new()),
    ));
    let service = SearchService::new(selection.clone(), backend, location.clone());
    (service, selection, location)
}

#[tokio::test]
async fn test_empty_request_is_refused() {
    let backend = Arc::new(MockBackend::new());
    let (service, selection, _) = service(backend.clone());
    selection.toggle("en-de");

    let result = service.run_bilingual_query("   ").await;

    assert_eq!(result.unwrap_err(), SearchError::EmptyRequest);
    assert!(backend.queries.lock().is_empty());
}

#[tokio::test]
async fn test_query_without_selection_is_refused() {
    let backend = Arc::new(MockBackend::new());
    let (service, _, location) = service(backend.clone());

    let result = service.run_bilingual_query("haus").await;

    assert_eq!(result.unwrap_err(), SearchError::NoDictionarySelected);
    assert!(backend.queries.lock().is_empty());
    assert!(location.search_param(parameters::QUERY_STRING).is_none());
}

#[tokio::test]
async fn test_query_uses_selection_and_records_request() {
    let backend = Arc::new(MockBackend::new());
    let (service, selection, location) = service(backend.clone());
    selection.toggle("de-en");
    selection.toggle("de-no");

    let response = service.run_bilingual_query(" haus ").await.unwrap();

    assert_eq!(response.request_string, "haus");
    assert_eq!(
        *backend.queries.lock(),
        vec![("de-en,de-no".to_string(), "haus".to_string())]
    );
    assert_eq!(
        location.search_param(parameters::QUERY_STRING).as_deref(),
        Some("haus")
    );
}

#[tokio::test]
async fn test_backend_failure_is_reported() {
    let backend = Arc::new(MockBackend::new());
    *backend.query_result.lock() = Some(Err(BackendError::TooManyRequests));
    let (service, selection, _) = service(backend);
    selection.toggle("de-en");

    let result = service.run_bilingual_query("haus").await;

    assert_eq!(
        result.unwrap_err(),
        SearchError::Backend(BackendError::TooManyRequests)
    );
}

#[tokio::test]
async fn test_click_query_replaces_selection() {
    let backend = Arc::new(MockBackend::new());
    backend.push_catalog(Ok(vec![dictionary("de-en"), dictionary("de-sv")]));
    let (service, selection, _) = service(backend.clone());
    selection.reload_catalog().await.unwrap();
    selection.toggle("de-en");

    service.run_click_query("de-sv,xx-yy", "hund").await.unwrap();

    assert_eq!(selection.current_selection_string(), "de-sv");
    assert_eq!(
        *backend.queries.lock(),
        vec![("de-sv".to_string(), "hund".to_string())]
    );
}

#[tokio::test]
async fn test_click_query_with_empty_request_keeps_selection() {
    let backend = Arc::new(MockBackend::new());
    let (service, selection, location) = service(backend.clone());
    selection.toggle("de-en");

    let result = service.run_click_query("de-sv", "  ").await;

    assert_eq!(result.unwrap_err(), SearchError::EmptyRequest);
    assert_eq!(selection.current_selection_string(), "de-en");
    assert_eq!(
        location.search_param(parameters::DICTIONARIES).as_deref(),
        Some("de-en")
    );
    assert!(backend.queries.lock().is_empty());
}

#[tokio::test]
async fn test_click_query_with_unknown_dictionaries_keeps_selection() {
    let backend = Arc::new(MockBackend::new());
    backend.push_catalog(Ok(vec![dictionary("de-en")]));
    let (service, selection, location) = service(backend.clone());
    selection.reload_catalog().await.unwrap();
    selection.toggle("de-en");

    let result = service.run_click_query("xx-yy,", "hund").await;

    assert_eq!(result.unwrap_err(), SearchError::NoDictionarySelected);
    assert_eq!(selection.current_selection_string(), "de-en");
    assert_eq!(
        location.search_param(parameters::DICTIONARIES).as_deref(),
        Some("de-en")
    );
    assert!(backend.queries.lock().is_empty());
}
