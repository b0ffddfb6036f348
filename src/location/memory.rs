// In-process location holding an ordered list of query parameters

use parking_lot::Mutex;
use reqwest::Url;

use super::Location;

// Only used as a carrier for the url crate's form encoding
const PARSE_BASE: &str = "http://localhost/";

/// Parse a raw query string (`a=1&b=2`, leading `?` tolerated) into decoded pairs
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    let query = query.trim().trim_start_matches('?');
    if query.is_empty() {
        return Vec::new();
    }

    let Ok(mut url) = Url::parse(PARSE_BASE) else {
        return Vec::new();
    };
    url.set_query(Some(query));
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Build an encoded query string from pairs, preserving their order
pub fn build_query_string(pairs: &[(String, String)]) -> String {
    let Ok(mut url) = Url::parse(PARSE_BASE) else {
        return String::new();
    };
    if pairs.is_empty() {
        return String::new();
    }
    url.query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    url.query().unwrap_or_default().to_string()
}

/// Location kept in memory, e.g. seeded from a command line argument
#[derive(Debug, Default)]
pub struct MemoryLocation {
    params: Mutex<Vec<(String, String)>>,
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a location from a raw query string
    pub fn from_query(query: &str) -> Self {
        let mut params: Vec<(String, String)> = Vec::new();
        for (name, value) in parse_query_string(query) {
            // Last occurrence wins, first position is kept
            match params.iter_mut().find(|(n, _)| *n == name) {
                Some(existing) => existing.1 = value,
                None => params.push((name, value)),
            }
        }
        Self {
            params: Mutex::new(params),
        }
    }
}

impl Location for MemoryLocation {
    fn search_param(&self, name: &str) -> Option<String> {
        self.params
            .lock()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_search_param(&self, name: &str, value: &str) {
        let mut params = self.params.lock();
        if value.is_empty() {
            params.retain(|(n, _)| n != name);
            return;
        }
        match params.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => params.push((name.to_string(), value.to_string())),
        }
    }

    fn query_string(&self) -> String {
        build_query_string(&self.params.lock())
    }
}
