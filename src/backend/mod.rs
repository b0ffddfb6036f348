//! Access to the Metadict REST backend.
//!
//! [`BackendAccess`] decouples the client from the transport so the
//! selection manager and services can be tested with mock backends. The
//! production implementation is [`HttpBackend`].

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::model::{
    BilingualDictionary, Credentials, Link, LinkContainer, QueryLogEntry, QueryResponse,
    RegistrationData, ResponseContainer, ResponseStatus, SystemStatus, UserSession,
};

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// The request could not be sent or no response was received
    #[error("Network error: {0}")]
    Network(String),
    /// The backend answered with an unexpected HTTP status and no response container
    #[error("HTTP error: {0}")]
    Http(u16),
    /// The request conflicts with existing data, e.g. the user name is taken
    #[error("Conflict with existing data")]
    Conflict,
    /// The backend rate-limited the client
    #[error("Too many requests")]
    TooManyRequests,
    /// The response container carried a non-OK status
    #[error("Backend responded with {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: ResponseStatus,
        message: Option<String>,
    },
    /// The response container was OK but had no data
    #[error("Response contained no data")]
    MissingData,
    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Backend trait for Metadict REST operations.
///
/// Implementations return unwrapped payloads; response container
/// handling is shared via [`unwrap_container`].
#[async_trait]
pub trait BackendAccess: Send + Sync {
    /// Fetch the catalog of bidirectional bilingual dictionaries.
    async fn fetch_bilingual_dictionaries(&self) -> Result<Vec<BilingualDictionary>, BackendError>;

    /// Run a bilingual query against the given selection string.
    async fn execute_bilingual_query(
        &self,
        dictionaries: &str,
        request: &str,
    ) -> Result<QueryResponse, BackendError>;

    /// Query version and uptime of the backend.
    async fn query_system_status(&self) -> Result<SystemStatus, BackendError>;

    /// Load a page of the query history, following `link` when given.
    async fn load_history(
        &self,
        link: Option<&Link>,
    ) -> Result<(Vec<QueryLogEntry>, LinkContainer), BackendError>;

    /// Start a session; later requests are sent on behalf of the user.
    async fn authenticate(&self, credentials: &Credentials) -> Result<UserSession, BackendError>;

    /// Query the user of the current session.
    async fn session_info(&self) -> Result<UserSession, BackendError>;

    /// End the current session.
    async fn logout(&self) -> Result<(), BackendError>;

    /// Create a new user account.
    async fn register(&self, registration: &RegistrationData) -> Result<(), BackendError>;
}

/// Unwrap a response container, keeping its paging links
pub fn unwrap_container<T>(
    container: ResponseContainer<T>,
) -> Result<(T, LinkContainer), BackendError> {
    crate::debug!("Received response with status {}", container.status);

    if container.status != ResponseStatus::Ok {
        return Err(BackendError::Status {
            status: container.status,
            message: container.message,
        });
    }

    let links = LinkContainer::from_links(&container.links);
    let data = container.data.ok_or(BackendError::MissingData)?;
    Ok((data, links))
}

#[cfg(test)]
#[path = "mod_test.rs"]
pub(crate) mod tests;
