// Response container and payload types of the Metadict REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BilingualDictionary, Language};

/// Status code carried in every response container
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// The request was processed successfully
    Ok,
    /// The backend core failed internally
    InternalError,
    /// The request was malformed
    MalformedQuery,
    /// The caller is not authorized for the resource
    Unauthorized,
    /// Any other failure, including statuses this client does not know
    #[serde(other)]
    Error,
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseStatus::Ok => write!(f, "OK"),
            ResponseStatus::Error => write!(f, "ERROR"),
            ResponseStatus::InternalError => write!(f, "INTERNAL_ERROR"),
            ResponseStatus::MalformedQuery => write!(f, "MALFORMED_QUERY"),
            ResponseStatus::Unauthorized => write!(f, "UNAUTHORIZED"),
        }
    }
}

/// A link to a related resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

/// Paging links extracted from a response container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkContainer {
    pub next: Option<Link>,
    pub previous: Option<Link>,
}

impl LinkContainer {
    /// Sort links by relation; unknown relations are ignored
    pub fn from_links(links: &[Link]) -> Self {
        let mut container = Self::default();
        for link in links {
            match link.rel.as_str() {
                "next" => container.next = Some(link.clone()),
                "previous" => container.previous = Some(link.clone()),
                other => crate::warn!("Unknown link relationship: {}", other),
            }
        }
        container
    }
}

/// Envelope wrapping every backend response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseContainer<T> {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A word or phrase with its descriptive attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionaryObject {
    pub general_form: String,
    pub language: Option<Language>,
    pub grammatical_gender: Option<String>,
    pub abbreviation: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub pronunciation: Option<String>,
    pub meanings: Vec<String>,
    pub alternate_forms: Vec<String>,
}

/// A single translation pair in a query result
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BilingualEntry {
    pub entry_type: String,
    pub entry_score: f64,
    pub source_engine: Option<String>,
    pub source: DictionaryObject,
    pub target: DictionaryObject,
}

/// Query results grouped by the backend's grouping strategy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BilingualResultGroup {
    pub group_identifier: String,
    pub result_entries: Vec<BilingualEntry>,
}

/// Result of a bilingual query
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryResponse {
    pub request_string: String,
    pub grouping_type: Option<String>,
    pub grouped_bilingual_entries: Vec<BilingualResultGroup>,
}

impl QueryResponse {
    /// Total number of translation pairs across all groups
    pub fn entry_count(&self) -> usize {
        self.grouped_bilingual_entries
            .iter()
            .map(|g| g.result_entries.len())
            .sum()
    }
}

/// A previously executed query as recorded by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryLogEntry {
    pub query_string: String,
    pub request_time: DateTime<Utc>,
    #[serde(default)]
    pub dictionaries: Vec<BilingualDictionary>,
    #[serde(default)]
    pub languages: Vec<Language>,
}

/// Version and uptime information of the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemStatus {
    pub version: String,
    pub revision: String,
    pub build_time: String,
    pub start_time: String,
    pub uptime: String,
}
