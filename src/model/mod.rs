// Wire model of the Metadict REST backend

mod dictionary;
mod response;
mod session;

pub use dictionary::{flag_icon_class, BilingualDictionary, Language};
pub use response::{
    BilingualEntry, BilingualResultGroup, DictionaryObject, Link, LinkContainer, QueryLogEntry,
    QueryResponse, ResponseContainer, ResponseStatus, SystemStatus,
};
pub use session::{Credentials, RegistrationData, UserSession};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
