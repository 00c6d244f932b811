pub mod error;
pub mod location_list;
pub mod url_resolver;
