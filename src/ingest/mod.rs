pub mod error;
pub mod location_worker;
pub mod page_source;
