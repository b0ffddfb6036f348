// HTTP implementation of BackendAccess
// Contains the request/response handling, testable independently from the network

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::{unwrap_container, BackendAccess, BackendError};
use crate::events::BackendEventEmitter;
use crate::model::{
    BilingualDictionary, Credentials, Link, LinkContainer, QueryLogEntry, QueryResponse,
    RegistrationData, ResponseContainer, ResponseStatus, SystemStatus, UserSession,
};
use crate::storage::{storage_keys, LocalStorage};
use crate::{debug, info, warn};

pub const DICTIONARIES_RESOURCE: &str = "dictionaries";
pub const QUERY_RESOURCE: &str = "query";
pub const STATUS_RESOURCE: &str = "status";
pub const HISTORY_RESOURCE: &str = "history";
pub const SESSION_RESOURCE: &str = "session";
pub const REGISTER_RESOURCE: &str = "register";

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "sessionToken";

/// Backend reached over HTTP with reqwest
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    emitter: Option<Arc<dyn BackendEventEmitter>>,
    /// Where the session token is kept between invocations
    session_storage: Option<Arc<dyn LocalStorage>>,
}

impl HttpBackend {
    /// Create a backend for the given base URL (e.g. `http://localhost:8080/api`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::Network(format!("Invalid backend URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Network(format!(
                "Backend URL '{}' cannot be used as a base",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            emitter: None,
            session_storage: None,
        })
    }

    /// Attach an emitter that is notified when the backend rate-limits the client
    pub fn with_emitter(mut self, emitter: Arc<dyn BackendEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Keep the session token in `storage` and send it with every request
    pub fn with_session_storage(mut self, storage: Arc<dyn LocalStorage>) -> Self {
        self.session_storage = Some(storage);
        self
    }

    /// Token of the current session, if any
    pub fn session_token(&self) -> Option<String> {
        self.session_storage
            .as_ref()
            .and_then(|storage| storage.get(storage_keys::SESSION_TOKEN))
            .filter(|token| !token.is_empty())
    }

    /// Base URL all resources are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL of a resource below the base URL; segments are percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Resolve a history paging link, falling back to the first page
    pub fn history_url(&self, link: Option<&Link>) -> Url {
        let Some(link) = link else {
            return self.endpoint(&[HISTORY_RESOURCE]);
        };

        let href = link.href.trim_start_matches('/');
        if !href.starts_with(HISTORY_RESOURCE) {
            warn!("Ignoring link {} outside of the history resource", link.href);
            return self.endpoint(&[HISTORY_RESOURCE]);
        }

        debug!("Using link {} for fetching history", link.href);
        let (path, query) = match href.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (href, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut url = self.endpoint(&segments);
        url.set_query(query);
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = self.session_token() {
            builder = builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        builder
    }

    fn json_request<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<RequestBuilder, BackendError> {
        let body = serde_json::to_string(body).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(self
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .body(body))
    }

    /// Send a request and collect status, headers and body
    async fn send(
        &self,
        builder: RequestBuilder,
    ) -> Result<(u16, HeaderMap, String), BackendError> {
        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Ok((status, headers, body))
    }

    async fn get<T: DeserializeOwned + Send>(
        &self,
        url: Url,
    ) -> Result<(T, LinkContainer), BackendError> {
        debug!("GET {}", url);
        let (status, _, body) = self.send(self.request(Method::GET, url.clone())).await?;
        self.report_rate_limit(&url, decode_response(status, &body))
    }

    /// Notify the emitter when a result says the backend rate-limited the client
    fn report_rate_limit<T>(
        &self,
        url: &Url,
        result: Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        if let Err(BackendError::TooManyRequests) = &result {
            warn!("Backend rate-limited request to {}", url);
            if let Some(emitter) = &self.emitter {
                emitter.emit_too_many_requests();
            }
        }
        result
    }

    /// Remember the session token set by the backend; an empty cookie ends the session
    fn store_session_cookie(&self, headers: &HeaderMap) {
        let Some(storage) = &self.session_storage else {
            return;
        };
        let cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok());
        match session_cookie_value(cookies) {
            Some(token) if token.is_empty() => {
                crate::persist_or_warn!(storage.remove(storage_keys::SESSION_TOKEN), "session token")
            }
            Some(token) => {
                crate::persist_or_warn!(
                    storage.set(storage_keys::SESSION_TOKEN, &token),
                    "session token"
                )
            }
            None => debug!("Response did not set a session cookie"),
        }
    }

    fn clear_session(&self) {
        if let Some(storage) = &self.session_storage {
            crate::persist_or_warn!(storage.remove(storage_keys::SESSION_TOKEN), "session token");
        }
    }
}

/// Extract the session token from `Set-Cookie` header values
pub fn session_cookie_value<'a, I>(set_cookies: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    set_cookies.into_iter().find_map(|cookie| {
        let pair = cookie.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        (name.trim() == SESSION_COOKIE).then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Map a failed HTTP exchange to a BackendError
fn failure_from_status(status: u16, body: &str) -> BackendError {
    let container = serde_json::from_str::<ResponseContainer<serde_json::Value>>(body).ok();
    match status {
        429 => BackendError::TooManyRequests,
        401 => {
            debug!("User not authorized");
            BackendError::Status {
                status: ResponseStatus::Unauthorized,
                message: container.and_then(|c| c.message),
            }
        }
        409 => BackendError::Conflict,
        _ => match container {
            Some(container) if container.status != ResponseStatus::Ok => BackendError::Status {
                status: container.status,
                message: container.message,
            },
            _ => BackendError::Http(status),
        },
    }
}

/// Check an HTTP status for responses that carry no payload
pub fn decode_empty_response(status: u16, body: &str) -> Result<(), BackendError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(failure_from_status(status, body))
    }
}

/// Turn an HTTP status and body into the unwrapped payload
pub fn decode_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<(T, LinkContainer), BackendError> {
    if !(200..300).contains(&status) {
        return Err(failure_from_status(status, body));
    }
    let container = serde_json::from_str::<ResponseContainer<T>>(body)
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    unwrap_container(container)
}

#[async_trait]
impl BackendAccess for HttpBackend {
    async fn fetch_bilingual_dictionaries(&self) -> Result<Vec<BilingualDictionary>, BackendError> {
        let url = self.endpoint(&[DICTIONARIES_RESOURCE, "bilingual", "bidirected"]);
        let (dictionaries, _) = self.get(url).await?;
        Ok(dictionaries)
    }

    async fn execute_bilingual_query(
        &self,
        dictionaries: &str,
        request: &str,
    ) -> Result<QueryResponse, BackendError> {
        let url = self.endpoint(&[QUERY_RESOURCE, dictionaries, request]);
        let (response, _) = self.get(url).await?;
        Ok(response)
    }

    async fn query_system_status(&self) -> Result<SystemStatus, BackendError> {
        let url = self.endpoint(&[STATUS_RESOURCE]);
        let (status, _) = self.get(url).await?;
        Ok(status)
    }

    async fn load_history(
        &self,
        link: Option<&Link>,
    ) -> Result<(Vec<QueryLogEntry>, LinkContainer), BackendError> {
        let url = self.history_url(link);
        self.get(url).await
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<UserSession, BackendError> {
        let url = self.endpoint(&[SESSION_RESOURCE]);
        debug!("POST {}", url);
        let request = self.json_request(Method::POST, url.clone(), credentials)?;
        let (status, headers, body) = self.send(request).await?;

        let (session, _) =
            self.report_rate_limit(&url, decode_response::<UserSession>(status, &body))?;
        self.store_session_cookie(&headers);
        info!("Logged in as {}", session.name);
        Ok(session)
    }

    async fn session_info(&self) -> Result<UserSession, BackendError> {
        let (session, _) = self.get(self.endpoint(&[SESSION_RESOURCE])).await?;
        Ok(session)
    }

    async fn logout(&self) -> Result<(), BackendError> {
        let url = self.endpoint(&[SESSION_RESOURCE]);
        debug!("DELETE {}", url);
        let result = self.send(self.request(Method::DELETE, url.clone())).await;
        // The token is forgotten even if the backend could not be reached
        self.clear_session();
        let (status, _, body) = result?;
        self.report_rate_limit(&url, decode_empty_response(status, &body))
    }

    async fn register(&self, registration: &RegistrationData) -> Result<(), BackendError> {
        let url = self.endpoint(&[REGISTER_RESOURCE]);
        debug!("POST {}", url);
        let request = self.json_request(Method::POST, url.clone(), registration)?;
        let (status, _, body) = self.send(request).await?;
        self.report_rate_limit(&url, decode_empty_response(status, &body))
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
