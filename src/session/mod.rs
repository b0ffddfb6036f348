//! User sessions on the Metadict backend.
//!
//! The query history is only available to logged in users. [`SessionManager`]
//! validates login and registration requests before they reach the backend
//! and remembers which user is logged in.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::backend::{BackendAccess, BackendError};
use crate::model::{Credentials, RegistrationData, ResponseStatus, UserSession};
use crate::{debug, info};

/// Error types for session operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// Name or password is empty
    #[error("User name and password are required")]
    MissingCredentials,
    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,
    /// The backend rejected the credentials
    #[error("Invalid user name or password")]
    InvalidCredentials,
    /// Registration failed because the name is taken
    #[error("User name '{0}' is already taken")]
    DuplicateUserName(String),
    #[error("Session request failed: {0}")]
    Backend(#[from] BackendError),
}

fn is_unauthorized(error: &BackendError) -> bool {
    matches!(
        error,
        BackendError::Status {
            status: ResponseStatus::Unauthorized,
            ..
        }
    )
}

/// Tracks the logged in user
pub struct SessionManager {
    backend: Arc<dyn BackendAccess>,
    user: Mutex<Option<UserSession>>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn BackendAccess>) -> Self {
        Self {
            backend,
            user: Mutex::new(None),
        }
    }

    /// Log in with the given credentials
    pub async fn login(&self, credentials: &Credentials) -> Result<UserSession, SessionError> {
        if credentials.name.trim().is_empty() || credentials.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        let session = match self.backend.authenticate(credentials).await {
            Ok(session) => session,
            Err(e) if is_unauthorized(&e) => {
                debug!("Login for {} rejected", credentials.name);
                return Err(SessionError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        info!("User {} logged in", session.name);
        *self.user.lock() = Some(session.clone());
        Ok(session)
    }

    /// Ask the backend who is logged in; `None` when there is no valid session
    pub async fn refresh(&self) -> Result<Option<UserSession>, SessionError> {
        let session = match self.backend.session_info().await {
            Ok(session) => Some(session),
            Err(e) if is_unauthorized(&e) => None,
            Err(e) => return Err(e.into()),
        };
        *self.user.lock() = session.clone();
        Ok(session)
    }

    /// End the session; the local user is forgotten even if the backend call fails
    pub async fn logout(&self) -> Result<(), SessionError> {
        let previous = self.user.lock().take();
        if let Some(user) = previous {
            info!("Logging out user {}", user.name);
        }
        self.backend.logout().await?;
        Ok(())
    }

    /// Create a new account
    pub async fn register(&self, registration: &RegistrationData) -> Result<(), SessionError> {
        if registration.name.trim().is_empty() || registration.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        if registration.password != registration.confirm_password {
            return Err(SessionError::PasswordMismatch);
        }

        debug!("Requesting new user registration for {}", registration.name);
        match self.backend.register(registration).await {
            Ok(()) => {
                info!("Registered new user {}", registration.name);
                Ok(())
            }
            Err(BackendError::Conflict) => {
                Err(SessionError::DuplicateUserName(registration.name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn logged_in_user(&self) -> Option<UserSession> {
        self.user.lock().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.lock().is_some()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
