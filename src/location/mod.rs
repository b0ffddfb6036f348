//! URL query parameter access.
//!
//! The client mirrors part of its state into the query string of the
//! current location so that a view can be bookmarked or shared. The
//! [`Location`] trait abstracts over where that location lives.

mod memory;

pub use memory::{build_query_string, parse_query_string, MemoryLocation};

/// Names of the query parameters used by the client
pub mod parameters {
    pub const DICTIONARIES: &str = "dictionaries";
    pub const QUERY_STRING: &str = "queryString";
}

/// Access to the query parameters of the current location
pub trait Location: Send + Sync {
    /// Get the value of the query parameter `name`
    fn search_param(&self, name: &str) -> Option<String>;

    /// Set the query parameter `name`; an empty value removes the parameter
    fn set_search_param(&self, name: &str, value: &str);

    /// Render all parameters as an encoded query string (without leading `?`)
    fn query_string(&self) -> String;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
