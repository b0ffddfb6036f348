// Bilingual dictionary descriptors as delivered by the backend catalog

use serde::{Deserialize, Serialize};

/// A language, optionally narrowed to a dialect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// Language code (e.g. "de")
    pub identifier: String,
    /// Human readable name of the language
    #[serde(default)]
    pub display_name: String,
    /// Dialect code, if the language is a dialect variant (e.g. "ny" for Nynorsk)
    #[serde(default)]
    pub dialect: Option<String>,
    /// Human readable name of the dialect
    #[serde(default)]
    pub dialect_display_name: Option<String>,
}

/// A source/target language pairing offered by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BilingualDictionary {
    pub source: Language,
    pub target: Language,
    /// Whether the backend can query the pairing in both directions
    #[serde(default)]
    pub bidirectional: bool,
    /// Query key without dialects (e.g. "de-no")
    pub query_string: String,
    /// Query key including dialects (e.g. "de-no_ny")
    pub query_string_with_dialect: String,
}

impl BilingualDictionary {
    /// Exact, case-sensitive match against the plain or the dialect-qualified key
    pub fn matches_key(&self, key: &str) -> bool {
        self.query_string == key || self.query_string_with_dialect == key
    }
}

/// CSS class for the flag of a language's country
pub fn flag_icon_class(language: &Language) -> String {
    let identifier = match language.identifier.as_str() {
        "en" => "gb",
        "sv" => "se",
        other => other,
    };
    format!("flag-icon-{}", identifier)
}
