// Dictionary selection module - keeps the set of dictionaries chosen for queries
// in sync with the backend catalog, the location and local storage

mod codec;
mod selection;

pub use codec::{join_selection, split_selection, SEPARATOR};
pub use selection::{CatalogError, DictionarySelectionManager};
