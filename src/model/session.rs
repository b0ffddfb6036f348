// Session and registration payloads

use serde::{Deserialize, Serialize};

/// The user a session belongs to
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserSession {
    pub name: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub name: String,
    pub password: String,
    /// Request a long-running session
    #[serde(default)]
    pub stay_logged_in: bool,
}

/// Request to create a new user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}
